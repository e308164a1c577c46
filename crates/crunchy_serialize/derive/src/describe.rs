use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Index, LitStr, Member, Type};

use crate::attributes::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// Parsed input

struct FieldData {
    member: Member,
    name: LitStr,
    ty: Type,
    ignore: bool,
}

enum Shape {
    Named,
    Unnamed,
    Unit,
}

pub(crate) struct DescribeInput<'a> {
    ident: &'a syn::Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
    shape: Shape,
    fields: Vec<FieldData>,
}

impl<'a> DescribeInput<'a> {
    pub fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new(
                input.ident.span(),
                "`Describe` can only be derived for structs, use `ScalarEnum` for field-less enums",
            ));
        };

        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.lifetime.span(),
                "`Describe` types must be 'static",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        if attrs.type_path.is_some() && !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.ident.span(),
                "`type_path` is not supported on generic types",
            ));
        }
        if let Some(hint) = &attrs.hint
            && hint == "AfterAssignment"
            && attrs.init.is_none()
        {
            return Err(syn::Error::new(
                hint.span(),
                "`hint = AfterAssignment` needs `init = ...`, a default would discard the decoded members",
            ));
        }

        let shape = match &data.fields {
            Fields::Named(_) => Shape::Named,
            Fields::Unnamed(_) => Shape::Unnamed,
            Fields::Unit => Shape::Unit,
        };

        let fields = data
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
                let (member, name) = match &field.ident {
                    Some(ident) => (
                        Member::Named(ident.clone()),
                        LitStr::new(&ident.to_string(), ident.span()),
                    ),
                    None => (
                        Member::Unnamed(Index::from(index)),
                        LitStr::new(&index.to_string(), Span::call_site()),
                    ),
                };
                Ok(FieldData {
                    member,
                    name,
                    ty: field.ty.clone(),
                    ignore: field_attrs.ignore.is_some(),
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self {
            ident: &input.ident,
            generics: &input.generics,
            attrs,
            shape,
            fields,
        })
    }

    fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// The input generics plus the bounds the generated impls need.
    fn impl_generics(&self, crate_path: &syn::Path) -> Generics {
        let mut generics = self.generics.clone();
        if !self.is_generic() {
            return generics;
        }

        let type_params: Vec<_> = generics
            .params
            .iter()
            .filter_map(|param| match param {
                GenericParam::Type(param) => Some(param.ident.clone()),
                _ => None,
            })
            .collect();

        let where_clause = generics.make_where_clause();
        for ident in type_params {
            where_clause.predicates.push(syn::parse_quote! { #ident: 'static });
        }
        for field in &self.fields {
            let ty = &field.ty;
            if field.ignore {
                where_clause
                    .predicates
                    .push(syn::parse_quote! { #ty: ::core::default::Default });
            } else {
                where_clause.predicates.push(syn::parse_quote! {
                    #ty: #crate_path::Member + #crate_path::Construct
                });
            }
        }
        generics
    }
}

// -----------------------------------------------------------------------------
// Code generation

pub(crate) fn impl_describe(input: &DescribeInput, crate_path: &syn::Path) -> TokenStream {
    let type_path = impl_type_path(input, crate_path);
    let construct = impl_construct(input, crate_path);
    let describe = impl_describe_trait(input, crate_path);
    let member = impl_member(input, crate_path);
    let auto_register = impl_auto_register(input, crate_path);

    quote! {
        const _: () = {
            #type_path
            #construct
            #describe
            #member
            #auto_register
        };
    }
}

fn impl_type_path(input: &DescribeInput, crate_path: &syn::Path) -> TokenStream {
    let ident = input.ident;
    let name = LitStr::new(&ident.to_string(), ident.span());
    let generics = input.impl_generics(crate_path);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let type_path = match &input.attrs.type_path {
        Some(custom) => custom.to_token_stream(),
        None if input.is_generic() => quote! { ::core::any::type_name::<Self>() },
        None => quote! { ::core::concat!(::core::module_path!(), "::", #name) },
    };

    quote! {
        impl #impl_generics #crate_path::TypePath for #ident #ty_generics #where_clause {
            #[inline]
            fn type_path() -> &'static str {
                #type_path
            }

            #[inline]
            fn type_name() -> &'static str {
                #name
            }
        }
    }
}

fn impl_construct(input: &DescribeInput, crate_path: &syn::Path) -> TokenStream {
    let ident = input.ident;
    let generics = input.impl_generics(crate_path);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let values = input.fields.iter().map(|field| {
        if field.ignore {
            crate::path::default_()
        } else {
            let ty = &field.ty;
            quote! { <#ty as #crate_path::Construct>::allocate() }
        }
    });

    let allocate = match input.shape {
        Shape::Named => {
            let members = input.fields.iter().map(|field| &field.member);
            quote! { Self { #(#members: #values,)* } }
        }
        Shape::Unnamed => quote! { Self(#(#values,)*) },
        Shape::Unit => quote! { Self },
    };

    let hint = input.attrs.hint.as_ref().map(|hint| {
        quote! {
            const HINT: #crate_path::ConstructionHint = #crate_path::ConstructionHint::#hint;
        }
    });

    let initialize = match &input.attrs.init {
        Some(init) => Some(quote! {
            #[inline]
            fn initialize(&mut self) {
                #init(self);
            }
        }),
        None if input.attrs.runs_initializer() => {
            let default_ = crate::path::default_();
            Some(quote! {
                #[inline]
                fn initialize(&mut self) {
                    *self = #default_;
                }
            })
        }
        None => None,
    };

    quote! {
        impl #impl_generics #crate_path::Construct for #ident #ty_generics #where_clause {
            #hint

            #[inline]
            fn allocate() -> Self {
                #allocate
            }

            #initialize
        }
    }
}

fn impl_describe_trait(input: &DescribeInput, crate_path: &syn::Path) -> TokenStream {
    let ident = input.ident;
    let generics = input.impl_generics(crate_path);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let members = input.fields.iter().map(|field| {
        let FieldData {
            member,
            name,
            ty,
            ignore,
        } = field;
        if *ignore {
            quote! { .ignored::<#ty>(#name) }
        } else {
            quote! {
                .member::<#ty>(#name, |this| &this.#member, |this| &mut this.#member)
            }
        }
    });

    let builder = quote! {
        #crate_path::TypeDescriptor::<Self>::builder(
            <Self as #crate_path::TypePath>::type_path(),
            <Self as #crate_path::TypePath>::type_name(),
        )
        #(#members)*
        .build()
    };

    let body = if input.is_generic() {
        quote! {
            static CELL: #crate_path::GenericDescriptorCell = #crate_path::GenericDescriptorCell::new();
            CELL.get_or_insert::<Self>(|| #builder)
        }
    } else {
        quote! {
            static CELL: #crate_path::DescriptorCell<#ident> = #crate_path::DescriptorCell::new();
            CELL.get_or_init(|| #builder)
        }
    };

    quote! {
        impl #impl_generics #crate_path::Describe for #ident #ty_generics #where_clause {
            fn descriptor() -> &'static #crate_path::TypeDescriptor<Self> {
                #body
            }
        }
    }
}

fn impl_member(input: &DescribeInput, crate_path: &syn::Path) -> TokenStream {
    let ident = input.ident;
    let generics = input.impl_generics(crate_path);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #crate_path::Member for #ident #ty_generics #where_clause {
            #[inline]
            fn classification() -> #crate_path::Classification {
                #crate_path::Classification::Complex
            }

            #[inline]
            fn member_ref(&self) -> #crate_path::MemberRef<'_> {
                #crate_path::MemberRef::Complex(self)
            }

            #[inline]
            fn member_mut(&mut self) -> #crate_path::MemberMut<'_> {
                #crate_path::MemberMut::Complex(self)
            }
        }
    }
}

#[cfg(feature = "auto_register")]
fn impl_auto_register(input: &DescribeInput, crate_path: &syn::Path) -> TokenStream {
    let Some(span) = input.attrs.auto_register else {
        return TokenStream::new();
    };
    // Generic types cannot be collected.
    if input.is_generic() {
        return TokenStream::new();
    }

    let ident = input.ident;
    let auto_register_ = crate::path::auto_register_(crate_path);
    quote::quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::__AutoRegisterFunc(#crate_path::TypeRegistry::register::<#ident>)
        }
    }
}

#[cfg(not(feature = "auto_register"))]
fn impl_auto_register(_: &DescribeInput, _: &syn::Path) -> TokenStream {
    TokenStream::new()
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::DescribeInput;

    fn parses(input: DeriveInput) -> bool {
        DescribeInput::parse(&input).is_ok()
    }

    #[test]
    fn after_assignment_requires_init() {
        assert!(!parses(parse_quote! {
            #[crunchy(hint = AfterAssignment)]
            struct Late { value: u32 }
        }));
        assert!(parses(parse_quote! {
            #[crunchy(hint = AfterAssignment, init = finish)]
            struct Late { value: u32 }
        }));
        assert!(parses(parse_quote! {
            #[crunchy(hint = BeforeAssignment)]
            struct Early { value: u32 }
        }));
    }

    #[test]
    fn rejects_enums_and_lifetimes() {
        assert!(!parses(parse_quote! {
            enum Mode { A, B }
        }));
        assert!(!parses(parse_quote! {
            struct View<'a> { text: &'a str }
        }));
    }

    #[test]
    fn tuple_fields_are_named_by_index() {
        let input: DeriveInput = parse_quote! {
            struct Pair(u8, #[crunchy(ignore)] u16);
        };
        let parsed = DescribeInput::parse(&input).unwrap();
        let names: Vec<_> = parsed.fields.iter().map(|field| field.name.value()).collect();
        assert_eq!(names, ["0", "1"]);
        assert!(!parsed.fields[0].ignore);
        assert!(parsed.fields[1].ignore);
    }
}
