//! Proc-macro providing the `#[wrapper_value_object]` attribute.
//!
//! The attribute turns a field-less struct into the storage half of a wrapper
//! value object: it adds a private `value` field holding the declared type (or
//! a tuple of all declared types) and includes the member implementations that
//! `wrapper-value-object-codegen` wrote to `OUT_DIR` from `build.rs`.
//!
//! # Example
//!
//! ```rust,ignore
//! use wrapper_value_object_derive::wrapper_value_object;
//!
//! #[wrapper_value_object("HomeGoals", u8, "AwayGoals", u8)]
//! #[derive(Clone, Copy)]
//! pub struct MatchResult;
//!
//! let result = MatchResult::new(1, 2);
//! assert_eq!(result.home_goals(), 1);
//! ```
//!
//! Place the attribute above `#[derive(..)]` so the derives see the generated
//! storage field. Declarations inside function bodies cannot be detected here;
//! the build script rejects them.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ItemStruct;
use wrapper_value_object_codegen::{
    DiagnosticCode, RegistryHost, SourceLocation, TargetTypeDescriptor, TypeRegistry,
    artifact_file_name, check_declaration, parse_tokens,
};

/// Declare a wrapper value object.
///
/// Accepted arguments: nothing (a `uuid::Uuid` identifier), a single type, or
/// up to four `"Name", Type` pairs, plus the options
/// `GenerateImplicitConversionToPrimitive = bool`,
/// `GenerateComparisonOperators = Unset | True | False` and
/// `GenerateMathOperators = Unset | True | False`.
#[proc_macro_attribute]
pub fn wrapper_value_object(args: TokenStream, input: TokenStream) -> TokenStream {
    expand(args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(args: TokenStream2, input: TokenStream2) -> syn::Result<TokenStream2> {
    let item: ItemStruct = syn::parse2(input)?;
    let target = TargetTypeDescriptor::from_item_struct(&item, false, SourceLocation::default());
    if let Err(diagnostic) = check_declaration(&target) {
        let message = format!("{}: {}", diagnostic.code, diagnostic.message);
        return Err(match diagnostic.code {
            DiagnosticCode::GenericTypeNotSupported => syn::Error::new_spanned(&item.generics, message),
            DiagnosticCode::NotPartial => syn::Error::new_spanned(&item.fields, message),
            _ => syn::Error::new_spanned(&item.ident, message),
        });
    }

    let registry = TypeRegistry::with_builtins();
    let (fields, _options) = parse_tokens(args, &RegistryHost::new(&registry))
        .map_err(|err| err.to_syn_error())?;

    let types = fields.iter().map(|field| field.declared_type().ty());
    let storage = if fields.len() == 1 {
        quote!(#(#types)*)
    } else {
        quote!((#(#types),*))
    };

    let ItemStruct {
        attrs, vis, ident, ..
    } = item;
    let artifact = artifact_file_name(&ident.to_string());

    Ok(quote! {
        #(#attrs)*
        #vis struct #ident {
            value: #storage,
        }

        include!(concat!(env!("OUT_DIR"), "/", #artifact));
    })
}
