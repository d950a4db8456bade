use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod view;

/// Derive macro for the Imprint trait.
///
/// Structs become aggregates named after the full type path and the module
/// they are declared in; their fields are hashed in declaration order. Enums
/// become aggregates named `Type::Variant` holding the fields of the active
/// variant.
///
/// # Example
///
/// ```ignore
/// use imprint_core::Imprint;
///
/// #[derive(Imprint)]
/// struct Order {
///     id: u64,
///     lines: Vec<Line>,
///     #[imprint(skip)]
///     cache: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[imprint(skip)]` - Leave this field out of the hashed contract
/// - `#[imprint(rename = "name")]` - Name reported for this field in errors
/// - `#[imprint(display)]` (on the type) - Hash the `Display` output instead of the fields
#[proc_macro_derive(Imprint, attributes(imprint))]
pub fn derive_imprint(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_imprint_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_imprint_impl(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // Build where clause with Imprint bounds for type parameters
    let where_clause = build_where_clause(generics, where_clause);

    let container = parse_container_attrs(&input.attrs)?;
    let view_impl = if container.display {
        view::generate_rendered_view()
    } else {
        view::generate_view(input)?
    };

    Ok(quote! {
        impl #impl_generics ::imprint_core::Imprint for #name #ty_generics #where_clause {
            #view_impl
        }
    })
}

fn build_where_clause(
    generics: &syn::Generics,
    existing: Option<&syn::WhereClause>,
) -> proc_macro2::TokenStream {
    let type_params: Vec<_> = generics.type_params().map(|p| &p.ident).collect();

    if type_params.is_empty() && existing.is_none() {
        return quote! {};
    }

    let imprint_bounds = type_params.iter().map(|p| {
        quote! { #p: ::imprint_core::Imprint }
    });

    let existing_predicates = existing.map(|w| {
        let predicates = &w.predicates;
        quote! { #predicates, }
    }).unwrap_or_default();

    quote! {
        where
            #existing_predicates
            #(#imprint_bounds),*
    }
}

#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub display: bool,
}

fn parse_container_attrs(attrs: &[syn::Attribute]) -> syn::Result<ContainerAttrs> {
    let mut result = ContainerAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("imprint") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("display") {
                result.display = true;
                Ok(())
            } else {
                Err(meta.error("unknown imprint container attribute"))
            }
        })?;
    }

    Ok(result)
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub skip: bool,
    pub rename: Option<String>,
}

pub(crate) fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("imprint") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
            } else {
                return Err(meta.error("unknown imprint field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}
