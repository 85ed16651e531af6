use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Result, Visibility};

/// A parsed struct field.
pub struct FieldSpec {
    pub ident: Ident,
    pub ty: syn::Type,
    pub exported: bool,
    pub embed: bool,
    pub tags: Vec<(String, LitStr)>,
}

impl FieldSpec {
    fn parse(field: &syn::Field) -> Result<Self> {
        let Some(ident) = field.ident.clone() else {
            return Err(Error::new_spanned(field, "expected a named field"));
        };

        let mut embed = false;
        let mut tags = Vec::new();
        for attr in &field.attrs {
            if attr.path().is_ident("embed") {
                attr.meta.require_path_only()?;
                embed = true;
            } else if attr.path().is_ident("tags") {
                parse_tags(attr, &mut tags)?;
            }
        }

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            exported: matches!(field.vis, Visibility::Public(_)),
            embed,
            tags,
        })
    }
}

// #[tags(db = "id", json = "name,omitempty")]
fn parse_tags(attr: &Attribute, tags: &mut Vec<(String, LitStr)>) -> Result<()> {
    attr.parse_nested_meta(|meta| {
        let Some(name) = meta.path.get_ident() else {
            return Err(meta.error("expected a tag name"));
        };
        let value: LitStr = meta.value()?.parse()?;
        tags.push((name.unraw().to_string(), value));
        Ok(())
    })
}

pub fn parse_fields(input: &DeriveInput) -> Result<Vec<FieldSpec>> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(&input.ident, "`Record` can only be derived for structs"));
    };

    match &data.fields {
        Fields::Named(named) => named.named.iter().map(FieldSpec::parse).collect(),
        Fields::Unit => Ok(Vec::new()),
        Fields::Unnamed(_) => {
            Err(Error::new_spanned(&input.ident, "`Record` requires named fields"))
        }
    }
}

pub fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let fields = parse_fields(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let defs = fields.iter().map(|field| {
        let field_name = field.ident.unraw().to_string();
        let exported = field.exported;
        let ty = &field.ty;
        let tags = field.tags.iter().map(|(tag, value)| quote! { (#tag, #value) });
        let field_type = if field.embed {
            quote! { ::rowscan::FieldType::Embedded(<#ty as ::rowscan::Record>::fields) }
        } else {
            quote! { ::rowscan::FieldType::Value(<#ty as ::rowscan::FromValue>::KIND) }
        };

        quote! {
            ::rowscan::FieldDef {
                name: #field_name,
                exported: #exported,
                tags: &[#(#tags),*],
                ty: #field_type,
            }
        }
    });

    let arms = fields.iter().enumerate().map(|(index, field)| {
        let index = Literal::usize_unsuffixed(index);
        let ident = &field.ident;
        if field.embed {
            quote! {
                [#index, rest @ ..] => ::rowscan::Record::assign(&mut self.#ident, rest, value),
            }
        } else {
            quote! {
                [#index] => ::rowscan::assign(&mut self.#ident, value),
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::rowscan::Record for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::rowscan::FieldDef> {
                ::std::vec![#(#defs),*]
            }

            #[allow(unused_variables)]
            fn assign(&mut self, path: &[usize], value: ::rowscan::Value) -> bool {
                match path {
                    #(#arms)*
                    _ => false,
                }
            }
        }

        impl #impl_generics ::rowscan::Scan for #name #ty_generics #where_clause {
            fn shape() -> ::rowscan::Shape<Self> {
                ::rowscan::Shape::Record(::rowscan::RecordShape::of())
            }
        }
    })
}
