use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_record;

#[proc_macro_derive(FromRecord, attributes(io))]
pub fn derive_from_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_record::expand_from_record(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
