use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields};

/// Implements `portfolio_di::Build` for a struct.
///
/// Every field is built from the provider, except for fields marked with
/// `#[state]`, which are created using [`Default`].
#[proc_macro_derive(Build, attributes(state))]
pub fn derive_build(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    let Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "Build can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let fields = data.fields.clone();

    let (_, ty_generics, _) = input.generics.split_for_impl();
    let ty_generics = ty_generics.to_token_stream();

    let generics = &mut input.generics;
    generics
        .params
        .push(parse_quote!(__Provider: ::portfolio_di::Provider));
    let where_clause = generics.make_where_clause();
    where_clause
        .predicates
        .push(parse_quote!(Self: ::core::clone::Clone + 'static));
    for field in fields.iter().filter(|f| !is_state(f)) {
        let ty = &field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::portfolio_di::Build<__Provider>));
    }

    let ident = &input.ident;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();
    let construct = construct(&fields);

    quote! {
        impl #impl_generics ::portfolio_di::Build<__Provider> for #ident #ty_generics #where_clause {
            fn build(provider: &mut __Provider) -> Self {
                let cache = ::portfolio_di::Provider::cache(provider);
                if let ::core::option::Option::Some(cached) = cache.get::<Self>() {
                    return ::core::clone::Clone::clone(cached);
                }

                let value = #construct;
                ::portfolio_di::Provider::cache(provider)
                    .insert(::core::clone::Clone::clone(&value));
                value
            }
        }
    }
    .into()
}

fn is_state(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident("state"))
}

fn init(field: &Field) -> TokenStream2 {
    if is_state(field) {
        quote!(::core::default::Default::default())
    } else {
        quote!(::portfolio_di::Build::build(provider))
    }
}

fn construct(fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(named) => {
            let inits = named.named.iter().map(|field| {
                let ident = &field.ident;
                let init = init(field);
                quote!(#ident: #init)
            });
            quote!(Self { #(#inits),* })
        }
        Fields::Unnamed(unnamed) => {
            let inits = unnamed.unnamed.iter().map(init);
            quote!(Self(#(#inits),*))
        }
        Fields::Unit => quote!(Self),
    }
}
