use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, Ident};

/// Implements `enum_map::Enum` for an enum made only of unit variants.
#[proc_macro_derive(Enum)]
pub fn derive_enum(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let item = parse_macro_input!(input as DeriveInput);
    expand(&item)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn expand(item: &DeriveInput) -> syn::Result<TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "generic enums are not supported",
        ));
    }
    let name = &item.ident;
    let variants = unit_variants(item)?;
    let num = variants.len();
    let counter = 0..num;

    Ok(quote! {
        #[automatically_derived]
        impl enum_map::Enum for #name {
            type Arr = [Self; #num];
            const LEN: usize = #num;
            const ALL: Self::Arr = [
                #(
                    #name::#variants,
                )*
            ];

            fn to_index(&self) -> usize {
                match self {
                    #(
                        #name::#variants => #counter,
                    )*
                }
            }
        }
    })
}

fn unit_variants(item: &DeriveInput) -> syn::Result<Vec<&Ident>> {
    let Data::Enum(data_enum) = &item.data else {
        return Err(Error::new(item.ident.span(), "For enum only"));
    };
    let mut errors: Option<Error> = None;
    let mut idents = Vec::with_capacity(data_enum.variants.len());
    for v in &data_enum.variants {
        if !matches!(v.fields, Fields::Unit) {
            let e = Error::new(v.ident.span(), "support unit field only");
            match &mut errors {
                Some(acc) => acc.combine(e),
                None => errors = Some(e),
            }
            continue;
        }
        idents.push(&v.ident);
    }
    match errors {
        Some(e) => Err(e),
        None => Ok(idents),
    }
}
