//! Paths into `crunchy_serialize` used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// The path under which `crunchy_serialize` is reachable from the invoking
/// crate: `::crunchy_serialize` for direct dependents, `::crunchy::serialize`
/// through the facade.
///
/// Reads the caller's `Cargo.toml`. Obtain it once per macro call.
pub(crate) fn crunchy_serialize() -> syn::Path {
    crunchy_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("crunchy_serialize"))
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(crate_path: &syn::Path) -> TokenStream {
    quote! {
        #crate_path::__macro_exports::auto_register
    }
}

#[inline(always)]
pub(crate) fn option_(variant: &str) -> TokenStream {
    let variant = syn::Ident::new(variant, proc_macro2::Span::call_site());
    quote! { ::core::option::Option::#variant }
}

#[inline(always)]
pub(crate) fn default_() -> TokenStream {
    quote! { ::core::default::Default::default() }
}
