use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, ItemFn};

/// Wraps `#[tracing::instrument]` and records every call and its return value
/// at trace level.
///
/// The attribute arguments are passed on to `#[tracing::instrument]`.
#[proc_macro_attribute]
pub fn trace_instrument(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = proc_macro2::TokenStream::from(args);
    let mut item = parse_macro_input!(item as ItemFn);

    let function = item.sig.ident.to_string();
    item.block
        .stmts
        .insert(0, parse_quote! { ::tracing::trace!(function = #function, "call"); });
    item.attrs
        .insert(0, parse_quote! { #[::tracing::instrument(ret(level = "trace"), #args)] });

    quote!(#item).into()
}
