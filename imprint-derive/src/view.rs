use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::DeriveInput;

use crate::{parse_field_attrs, FieldAttrs};

/// Generates the `view()` method for a type hashed through its `Display` output.
pub fn generate_rendered_view() -> TokenStream {
    quote! {
        fn view(&self) -> ::imprint_core::View<'_> {
            ::imprint_core::View::Rendered(::std::string::ToString::to_string(self))
        }
    }
}

/// Generates the `view()` method implementation.
pub fn generate_view(input: &DeriveInput) -> syn::Result<TokenStream> {
    let body = match &input.data {
        syn::Data::Struct(data) => generate_view_struct(data)?,
        syn::Data::Enum(data) => generate_view_enum(data)?,
        syn::Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Imprint cannot be derived for unions",
            ))
        }
    };

    Ok(quote! {
        fn view(&self) -> ::imprint_core::View<'_> {
            #body
        }
    })
}

fn generate_view_struct(data: &syn::DataStruct) -> syn::Result<TokenStream> {
    let mut fields = Vec::new();
    for (index, f) in data.fields.iter().enumerate() {
        let attrs = parse_field_attrs(&f.attrs)?;
        if attrs.skip {
            continue;
        }
        let name = field_name(f, index, &attrs);
        let member = match &f.ident {
            Some(ident) => quote! { #ident },
            None => {
                let index = syn::Index::from(index);
                quote! { #index }
            }
        };
        fields.push(quote! { .field(#name, &self.#member) });
    }

    Ok(quote! {
        ::imprint_core::View::Aggregate(
            ::imprint_core::Aggregate::new(::std::any::type_name::<Self>(), ::std::module_path!())
                #(#fields)*
        )
    })
}

fn generate_view_enum(data: &syn::DataEnum) -> syn::Result<TokenStream> {
    if data.variants.is_empty() {
        return Ok(quote! { match *self {} });
    }

    let mut arms = Vec::new();
    let mut seen = HashSet::new();
    for v in &data.variants {
        let variant = &v.ident;
        let variant_name = parse_variant_attrs(&v.attrs)?
            .rename
            .unwrap_or_else(|| variant.to_string());
        // The variant name is part of the hashed aggregate name.
        if !seen.insert(variant_name.clone()) {
            return Err(syn::Error::new_spanned(
                v,
                format!("duplicate imprint variant name `{}`", variant_name),
            ));
        }

        let mut bindings = Vec::new();
        let mut fields = Vec::new();
        for (index, f) in v.fields.iter().enumerate() {
            let attrs = parse_field_attrs(&f.attrs)?;
            let binding = format_ident!("__field{}", index);
            match (&f.ident, attrs.skip) {
                (Some(ident), true) => bindings.push(quote! { #ident: _ }),
                (Some(ident), false) => bindings.push(quote! { #ident: #binding }),
                (None, true) => bindings.push(quote! { _ }),
                (None, false) => bindings.push(quote! { #binding }),
            }
            if !attrs.skip {
                let name = field_name(f, index, &attrs);
                fields.push(quote! { .field(#name, #binding) });
            }
        }

        let pattern = match &v.fields {
            syn::Fields::Named(_) => quote! { Self::#variant { #(#bindings),* } },
            syn::Fields::Unnamed(_) => quote! { Self::#variant ( #(#bindings),* ) },
            syn::Fields::Unit => quote! { Self::#variant },
        };

        arms.push(quote! {
            #pattern => ::imprint_core::View::Aggregate(
                ::imprint_core::Aggregate::new(
                    ::std::format!("{}::{}", ::std::any::type_name::<Self>(), #variant_name),
                    ::std::module_path!(),
                )
                #(#fields)*
            ),
        });
    }

    Ok(quote! {
        match self {
            #(#arms)*
        }
    })
}

/// Name used for a field in error positions. Tuple fields are named by index.
fn field_name(field: &syn::Field, index: usize, attrs: &FieldAttrs) -> String {
    if let Some(rename) = &attrs.rename {
        return rename.clone();
    }
    match &field.ident {
        Some(ident) => ident.to_string(),
        None => index.to_string(),
    }
}

#[derive(Default)]
struct VariantAttrs {
    rename: Option<String>,
}

fn parse_variant_attrs(attrs: &[syn::Attribute]) -> syn::Result<VariantAttrs> {
    let mut result = VariantAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("imprint") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unknown imprint variant attribute"))
            }
        })?;
    }

    Ok(result)
}
