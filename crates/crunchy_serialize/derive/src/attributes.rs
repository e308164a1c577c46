//! `#[crunchy(...)]` attribute parsing.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Ident, LitStr, Path};

pub(crate) const ATTRIBUTE_NAME: &str = "crunchy";

const HINTS: [&str; 3] = ["None", "BeforeAssignment", "AfterAssignment"];

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(value);
    Ok(())
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes on the type itself.
///
/// - `hint = BeforeAssignment | AfterAssignment | None`
/// - `init = path::to::fn`, called as `fn(&mut Self)`
/// - `type_path = "custom::Path"`
/// - `auto_register`
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub hint: Option<Ident>,
    pub init: Option<Path>,
    pub type_path: Option<LitStr>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("hint") {
            let hint: Ident = meta.value()?.parse()?;
            if !HINTS.iter().any(|name| hint == name) {
                return Err(syn::Error::new(
                    hint.span(),
                    "expected `None`, `BeforeAssignment` or `AfterAssignment`",
                ));
            }
            set_once(&mut self.hint, hint, &meta)
        } else if meta.path.is_ident("init") {
            let init: Path = meta.value()?.parse()?;
            set_once(&mut self.init, init, &meta)
        } else if meta.path.is_ident("type_path") {
            let path: LitStr = meta.value()?.parse()?;
            set_once(&mut self.type_path, path, &meta)
        } else if meta.path.is_ident("auto_register") {
            let span = meta.input.span();
            set_once(&mut self.auto_register, span, &meta)
        } else if meta.path.is_ident("ignore") {
            Err(meta.error("`ignore` applies to fields"))
        } else {
            Err(meta.error("unknown crunchy attribute"))
        }
    }

    /// Whether the hint asks the decoder to run initialization.
    pub fn runs_initializer(&self) -> bool {
        self.hint.as_ref().is_some_and(|hint| hint != "None")
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Attributes on a field: `ignore`.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub ignore: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("ignore") {
                        let span = meta.input.span();
                        set_once(&mut this.ignore, span, &meta)
                    } else {
                        Err(meta.error("unknown crunchy field attribute, expected `ignore`"))
                    }
                })?;
            }
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// repr

/// Integer kinds an enumeration may be encoded as.
const REPRS: [&str; 8] = ["i8", "u8", "i16", "u16", "i32", "u32", "i64", "u64"];

/// Reads the integer from `#[repr(...)]`, defaulting to `i32`.
pub(crate) fn parse_repr(attrs: &[Attribute]) -> syn::Result<Ident> {
    let mut repr: Option<Ident> = None;
    for attr in attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let Some(ident) = meta.path.get_ident() else {
                return Ok(());
            };
            let name = ident.to_string();
            if REPRS.contains(&name.as_str()) {
                set_once(&mut repr, ident.clone(), &meta)
            } else if matches!(name.as_str(), "isize" | "usize" | "i128" | "u128") {
                Err(meta.error(
                    "no scalar kind for this repr, use one of i8 u8 i16 u16 i32 u32 i64 u64",
                ))
            } else {
                // `C`, `align(..)` and friends.
                if meta.input.peek(syn::token::Paren) {
                    let _content;
                    syn::parenthesized!(_content in meta.input);
                }
                Ok(())
            }
        })?;
    }
    Ok(repr.unwrap_or_else(|| Ident::new("i32", Span::call_site())))
}
