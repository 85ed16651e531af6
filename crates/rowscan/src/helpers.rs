//! Typed accessors for dynamic results and bit-column support.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::holder::Valuer;
use crate::record::FromValue;
use crate::value::Value;

/// Convert a big-endian bit string (as returned for `BIT(n)` columns) to an
/// integer. Only the last eight bytes are significant.
#[must_use]
pub fn bit_to_uint(bytes: &[u8]) -> u64 {
    let tail = &bytes[bytes.len().saturating_sub(8)..];
    let mut buf = [0_u8; 8];
    buf[8 - tail.len()..].copy_from_slice(tail);
    u64::from_be_bytes(buf)
}

/// A `BIT(n)` column value. Resolves to [`Value::UInt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bits(pub Vec<u8>);

impl Valuer for Bits {
    fn value(&self) -> Value {
        Value::UInt(bit_to_uint(&self.0))
    }
}

/// Fetch `key` from a dynamic row as `K`, or `K::default()` when the key is
/// missing or holds a value `K` cannot represent.
#[must_use]
pub fn key<K, S>(data: &HashMap<String, Value, S>, key: &str) -> K
where
    K: FromValue + Default,
    S: BuildHasher,
{
    data.get(key).cloned().and_then(K::from_value).unwrap_or_default()
}

/// Fetch element `index` of a value list as `K`, or `K::default()` when out of
/// range or holding a value `K` cannot represent.
#[must_use]
pub fn pick<K: FromValue + Default>(data: &[Value], index: usize) -> K {
    data.get(index).cloned().and_then(K::from_value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits() {
        assert_eq!(bit_to_uint(&[]), 0);
        assert_eq!(bit_to_uint(&[1]), 1);
        assert_eq!(bit_to_uint(&[1, 0]), 256);
        assert_eq!(bit_to_uint(&[0xff; 8]), u64::MAX);
        assert_eq!(bit_to_uint(&[9, 0, 0, 0, 0, 0, 0, 0, 2]), 2);
        assert_eq!(Bits(vec![0, 5]).value(), Value::UInt(5));
    }

    #[test]
    fn typed_key() {
        let data = HashMap::from([
            ("id".to_string(), Value::Int(4)),
            ("name".to_string(), Value::from("ann")),
        ]);
        assert_eq!(key::<i64, _>(&data, "id"), 4);
        assert_eq!(key::<String, _>(&data, "name"), "ann");
        assert_eq!(key::<String, _>(&data, "id"), "");
        assert_eq!(key::<i64, _>(&data, "missing"), 0);
    }

    #[test]
    fn typed_pick() {
        let data = vec![Value::Int(1), Value::from("b")];
        assert_eq!(pick::<i32>(&data, 0), 1);
        assert_eq!(pick::<String>(&data, 1), "b");
        assert_eq!(pick::<i32>(&data, 1), 0);
        assert_eq!(pick::<i32>(&data, 2), 0);
    }
}
