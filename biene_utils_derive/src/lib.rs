use proc_macro::TokenStream;
use quote::ToTokens;
use syn::{parse_macro_input, parse_quote, ItemFn};

/// Instruments a function with a tracing span that records its arguments and
/// return value at trace level.
///
/// All arguments are forwarded to `#[tracing::instrument]`, so the usual
/// `skip(...)`/`fields(...)` syntax applies. The crate using this attribute
/// must depend on `tracing`.
#[proc_macro_attribute]
pub fn trace_instrument(meta: TokenStream, input: TokenStream) -> TokenStream {
    let meta = proc_macro2::TokenStream::from(meta);
    let mut item = parse_macro_input!(input as ItemFn);

    let block = item.block;
    item.block = parse_quote!({
        ::tracing::trace!("call");
        #block
    });
    item.attrs.insert(
        0,
        parse_quote!(#[::tracing::instrument(ret(level = "trace"), #meta)]),
    );

    item.into_token_stream().into()
}
