use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

use crate::attributes::{TypeAttributes, parse_repr};

pub(crate) struct ScalarEnumInput<'a> {
    ident: &'a Ident,
    attrs: TypeAttributes,
    /// `i8`, `u16`, ...
    repr: Ident,
    variants: Vec<&'a Ident>,
}

impl<'a> ScalarEnumInput<'a> {
    pub fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new(
                input.ident.span(),
                "`ScalarEnum` can only be derived for enums",
            ));
        };

        if !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.ident.span(),
                "`ScalarEnum` does not support generic enums",
            ));
        }

        let variants = data
            .variants
            .iter()
            .map(|variant| match variant.fields {
                Fields::Unit => Ok(&variant.ident),
                _ => Err(syn::Error::new(
                    variant.ident.span(),
                    "`ScalarEnum` variants cannot have fields",
                )),
            })
            .collect::<syn::Result<Vec<_>>>()?;

        if variants.is_empty() {
            return Err(syn::Error::new(
                input.ident.span(),
                "`ScalarEnum` needs at least one variant",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        if attrs.hint.is_some() || attrs.init.is_some() || attrs.auto_register.is_some() {
            return Err(syn::Error::new(
                input.ident.span(),
                "`ScalarEnum` only accepts the `type_path` attribute",
            ));
        }

        Ok(Self {
            ident: &input.ident,
            attrs,
            repr: parse_repr(&input.attrs)?,
            variants,
        })
    }
}

pub(crate) fn impl_scalar_enum(input: &ScalarEnumInput, crate_path: &syn::Path) -> TokenStream {
    let ident = input.ident;
    let repr = &input.repr;
    let kind = format_ident!("{}", repr.to_string().to_uppercase());
    let variants = &input.variants;
    let first = variants[0];

    let name = LitStr::new(&ident.to_string(), ident.span());
    let type_path = match &input.attrs.type_path {
        Some(custom) => quote! { #custom },
        None => quote! { ::core::concat!(::core::module_path!(), "::", #name) },
    };

    let some_ = crate::path::option_("Some");
    let none_ = crate::path::option_("None");

    quote! {
        const _: () = {
            impl #crate_path::ScalarEnum for #ident {
                const REPR: #crate_path::IntegralKind = #crate_path::IntegralKind::#kind;

                #[inline]
                fn to_repr(&self) -> #crate_path::IntegralValue {
                    match self {
                        #(Self::#variants => #crate_path::IntegralValue::#kind(Self::#variants as #repr),)*
                    }
                }

                fn from_repr(value: #crate_path::IntegralValue) -> ::core::option::Option<Self> {
                    match value {
                        #(#crate_path::IntegralValue::#kind(v) if v == Self::#variants as #repr => #some_(Self::#variants),)*
                        _ => #none_,
                    }
                }
            }

            impl #crate_path::ScalarType for #ident {
                const KIND: #crate_path::ScalarKind =
                    #crate_path::ScalarKind::Enum(#crate_path::IntegralKind::#kind);

                #[inline]
                fn to_scalar(&self) -> #crate_path::Scalar<'_> {
                    #crate_path::Scalar::Enum(#crate_path::ScalarEnum::to_repr(self))
                }

                #[inline]
                fn from_scalar(
                    value: #crate_path::ScalarValue,
                ) -> ::core::result::Result<Self, #crate_path::SerializeError> {
                    #crate_path::enum_from_scalar::<Self>(
                        value,
                        <Self as #crate_path::TypePath>::type_path(),
                    )
                }
            }

            impl #crate_path::Member for #ident {
                #[inline]
                fn classification() -> #crate_path::Classification {
                    #crate_path::Classification::EnumScalar(#crate_path::IntegralKind::#kind)
                }

                #[inline]
                fn member_ref(&self) -> #crate_path::MemberRef<'_> {
                    #crate_path::MemberRef::Scalar(#crate_path::ScalarType::to_scalar(self))
                }

                #[inline]
                fn member_mut(&mut self) -> #crate_path::MemberMut<'_> {
                    #crate_path::MemberMut::Scalar(self)
                }
            }

            impl #crate_path::TypePath for #ident {
                #[inline]
                fn type_path() -> &'static str {
                    #type_path
                }

                #[inline]
                fn type_name() -> &'static str {
                    #name
                }
            }

            impl #crate_path::Construct for #ident {
                /// The variant whose value is zero, else the first one.
                #[inline]
                fn allocate() -> Self {
                    match <Self as #crate_path::ScalarEnum>::from_repr(
                        #crate_path::IntegralValue::#kind(0),
                    ) {
                        #some_(value) => value,
                        #none_ => Self::#first,
                    }
                }
            }
        };
    }
}
