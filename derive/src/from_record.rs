use std::collections::HashMap;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitInt, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_record(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromRecord` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromRecord` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut elements: HashMap<u16, TokenStream2> = HashMap::new();
    let mut variables: HashMap<u16, TokenStream2> = HashMap::new();
    let mut headers: HashMap<Header, TokenStream2> = HashMap::new();

    for field in fields {
        let FieldMetadata {
            name,
            ty,
            identifier,
            handler,
            span,
        } = field;

        let (existing, number) = match identifier {
            Identifier::Element(number) => {
                let id = number.base10_parse::<u16>()?;

                let existing = match handler {
                    Some(handler) if handler.takes_bytes => {
                        let call = handler.call(&name, &ty, quote!(raw));
                        variables.insert(id, call)
                    }
                    Some(handler) => {
                        let call = handler.call(&name, &ty, quote!(value));
                        let assignment = quote! {
                            if let Ok(value) = ::core::convert::TryFrom::try_from(value) {
                                #call;
                            }
                        };
                        elements.insert(id, assignment)
                    }
                    None => {
                        let assignment = quote! {
                            if let Ok(value) = ::core::convert::TryFrom::try_from(value) {
                                self.#name = Some(value);
                            }
                        };
                        elements.insert(id, assignment)
                    }
                };

                (existing, Some(number))
            }
            Identifier::Header(header) => {
                let value = header.argument();

                let assignment = match handler {
                    Some(handler) => handler.call(&name, &ty, value),
                    None if header == Header::Gps => quote! { self.#name = Some(*#value) },
                    None => quote! { self.#name = Some(#value) },
                };

                (headers.insert(header, assignment), None)
            }
        };

        if existing.is_some() {
            Err(match number {
                Some(number) => Error::new(number.span(), "IO element identifiers must be unique."),
                None => Error::new(span, "Record field identifiers must be unique."),
            })?
        }
    }

    let header_methods = headers.into_iter().map(|(header, assignment)| match header {
        Header::Timestamp => quote! {
            fn add_timestamp(&mut self, timestamp: i64) {
                #assignment;
            }
        },
        Header::Priority => quote! {
            fn add_priority(&mut self, priority: u8) {
                #assignment;
            }
        },
        Header::Gps => quote! {
            fn add_gps(&mut self, gps: &::codec8e::GpsFix) {
                #assignment;
            }
        },
        Header::Event => quote! {
            fn add_event(&mut self, event_id: u16, _: u16) {
                #assignment;
            }
        },
    });

    let element_method = (!elements.is_empty()).then(|| {
        let cases = elements
            .into_iter()
            .map(|(id, assignment)| quote! { #id => { #assignment } });

        quote! {
            fn add_element(&mut self, id: u16, value: u64) {
                match id {
                    #(#cases)*
                    _ => {}
                };
            }
        }
    });

    let variable_method = (!variables.is_empty()).then(|| {
        let cases = variables
            .into_iter()
            .map(|(id, call)| quote! { #id => { #call; } });

        quote! {
            fn add_variable(&mut self, id: u16, value: u64, raw: &[u8]) {
                match id {
                    #(#cases)*
                    _ => FromRecord::add_element(self, id, value),
                };
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromRecord for #name {
            #(#header_methods)*
            #element_method
            #variable_method
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    identifier: Identifier,
    handler: Option<Handler>,
    span: proc_macro2::Span,
}

#[derive(Debug)]
enum Identifier {
    Element(LitInt),
    Header(Header),
}

/// A fixed field of the record, rather than an IO element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Header {
    Timestamp,
    Priority,
    Gps,
    Event,
}

impl Header {
    /// The parameter of the generated method receiving this field.
    fn argument(self) -> TokenStream2 {
        match self {
            Header::Timestamp => quote!(timestamp),
            Header::Priority => quote!(priority),
            Header::Gps => quote!(gps),
            Header::Event => quote!(event_id),
        }
    }
}

#[derive(Debug)]
struct Handler {
    closure: ExprClosure,
    takes_bytes: bool,
}

impl Handler {
    /// Invoke the closure on a struct field and a value.
    fn call(&self, name: &Ident, ty: &Type, value: TokenStream2) -> TokenStream2 {
        let body = &self.closure.body;
        let acc = &self.closure.inputs[0];
        let val = &self.closure.inputs[1];

        quote! {
            (|#acc: &mut #ty, #val| { #body })(&mut self.#name, #value)
        }
    }
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("io")) else {
            return Ok(None);
        };

        let span = attr.span();

        let IoAttribute {
            identifier,
            handler,
        } = attr.meta.require_list()?.parse_args()?;

        let handler = match handler {
            Some(closure) => {
                if closure.inputs.len() != 2 {
                    Err(Error::new_spanned(
                        &closure,
                        "Handler closure must have two parameters.",
                    ))?
                }

                let Pat::Type(pat_type) = &closure.inputs[1] else {
                    Err(Error::new_spanned(
                        &closure.inputs[1],
                        "Handler closure's second parameter must be annotated with the expected value type.",
                    ))?
                };

                // Elements received by reference are variable-width bytes.
                let takes_bytes = matches!(identifier, Identifier::Element(_))
                    && matches!(&*pat_type.ty, Type::Reference(_));

                Some(Handler {
                    closure,
                    takes_bytes,
                })
            }
            None => {
                require_option(&field.ty)?;
                None
            }
        };

        Ok(Some(Self {
            name,
            ty: field.ty.clone(),
            identifier,
            handler,
            span,
        }))
    }
}

/// Check that a field without a handler has type `Option<T>`.
fn require_option(ty: &Type) -> Result<()> {
    let Type::Path(path) = ty else {
        Err(Error::new_spanned(ty, "Field must have a type annotation."))?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    if segment.ident != "Option" {
        Err(Error::new_spanned(
            &segment.ident,
            "Field without a handler must have type `Option<T>`.",
        ))?
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(Error::new_spanned(
            &segment.arguments,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let Some(GenericArgument::Type(_)) = arguments.args.first() else {
        Err(Error::new_spanned(
            &arguments.args,
            "Generic argument of a field of type `Option<T>` must be a type.",
        ))?
    };

    Ok(())
}

#[derive(Debug)]
struct IoAttribute {
    identifier: Identifier,
    handler: Option<ExprClosure>,
}

impl Parse for IoAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let identifier = if let Ok(ident) = input.parse::<Ident>() {
            Identifier::Header(match ident.to_string().as_str() {
                "timestamp" => Header::Timestamp,
                "priority" => Header::Priority,
                "gps" => Header::Gps,
                "event" => Header::Event,
                _ => Err(Error::new_spanned(
                    ident,
                    "Identifier must be an integer literal, `timestamp`, `priority`, `gps` or `event`.",
                ))?,
            })
        } else {
            Identifier::Element(input.parse::<LitInt>()?)
        };

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self {
            identifier,
            handler,
        })
    }
}
