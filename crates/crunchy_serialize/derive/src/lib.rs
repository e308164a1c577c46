//! Derive macros for `crunchy_serialize`:
//!
//! - [`Describe`]
//! - [`ScalarEnum`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod describe;
mod path;
mod scalar_enum;

// -----------------------------------------------------------------------------
// Macros

/// # Automatic codec support
///
/// `#[derive(Describe)]` implements `TypePath`, `Construct`, `Member` and
/// `Describe` for a struct. Every field type must implement `Member` and
/// `Construct`.
///
/// Named fields are walked in name order. Tuple struct fields are named by
/// their index as a string, so `"10"` sorts before `"2"`.
///
/// ## Field attributes
///
/// `#[crunchy(ignore)]` excludes a field from walking. It is allocated with
/// `Default::default()` and needs no other trait.
///
/// ## Type attributes
///
/// ```rust, ignore
/// fn rebuild(cache: &mut Cache) { /* ... */ }
///
/// #[derive(Describe)]
/// #[crunchy(hint = AfterAssignment, init = rebuild)]
/// struct Cache {
///     entries: Vec<u32>,
///     #[crunchy(ignore)]
///     index: HashMap<u32, usize>,
/// }
/// ```
///
/// - `hint = None | BeforeAssignment | AfterAssignment`: when the decoder
///   runs initialization. Defaults to `None`.
/// - `init = path`: the initialization, called as `path(&mut self)`. With
///   `BeforeAssignment` but no `init`, initialization is
///   `*self = Default::default()`. `AfterAssignment` requires `init`.
/// - `type_path = "my::Path"`: overrides the registry path. Not allowed on
///   generic types, whose path is `core::any::type_name`.
/// - `auto_register`: collect the type for `TypeRegistry::auto_register`.
///   Ignored on generic types and without the `auto_register` feature.
#[proc_macro_derive(Describe, attributes(crunchy))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let input = match describe::DescribeInput::parse(&ast) {
        Ok(input) => input,
        Err(err) => return err.into_compile_error().into(),
    };

    let crate_path = path::crunchy_serialize();
    describe::impl_describe(&input, &crate_path).into()
}

/// # Field-less enums as scalars
///
/// `#[derive(ScalarEnum)]` implements `ScalarEnum`, `ScalarType`, `Member`,
/// `TypePath` and `Construct`. The value is encoded as the integer named
/// by `#[repr(..)]`, or `i32` without one. No tag is written.
///
/// `Construct::allocate` gives the variant with value zero if there is
/// one, else the first variant.
///
/// ```rust, ignore
/// #[derive(ScalarEnum)]
/// #[repr(u8)]
/// enum Facing {
///     North = 1,
///     South = 2,
/// }
/// ```
///
/// `#[crunchy(type_path = "...")]` is the only accepted attribute.
#[proc_macro_derive(ScalarEnum, attributes(crunchy))]
pub fn derive_scalar_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let input = match scalar_enum::ScalarEnumInput::parse(&ast) {
        Ok(input) => input,
        Err(err) => return err.into_compile_error().into(),
    };

    let crate_path = path::crunchy_serialize();
    scalar_enum::impl_scalar_enum(&input, &crate_path).into()
}
