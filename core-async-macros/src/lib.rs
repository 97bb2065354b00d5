//! Entry-point attribute macros for `core-async`.
//!
//! `#[core_async::test]` turns an `async fn` into a plain `#[test]` that
//! drives the body on a current-thread runtime. `#[core_async::test(start_paused)]`
//! does the same on a runtime whose clock starts paused, which the
//! progress-ticker tests rely on. `#[core_async::main]` wraps a binary's
//! async entry point.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Ident, ItemFn, Token};

#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = match TestOptions::parse(attr) {
        Ok(options) => options,
        Err(err) => return err.to_compile_error().into(),
    };
    let input = parse_macro_input!(item as ItemFn);
    match async_body(&input) {
        Ok(()) => expand_test(input, options),
        Err(err) => err.to_compile_error().into(),
    }
}

#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let tokens = TokenStream2::from(attr);
        return syn::Error::new_spanned(tokens, "#[core_async::main] does not accept arguments")
            .to_compile_error()
            .into();
    }
    let input = parse_macro_input!(item as ItemFn);
    match async_body(&input) {
        Ok(()) => expand_main(input),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct TestOptions {
    start_paused: bool,
}

impl TestOptions {
    fn parse(attr: TokenStream) -> syn::Result<Self> {
        let mut options = TestOptions::default();
        let idents = Punctuated::<Ident, Token![,]>::parse_terminated.parse(attr)?;
        for ident in idents {
            match ident.to_string().as_str() {
                "start_paused" => options.start_paused = true,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown core_async::test option `{other}`; expected `start_paused`"),
                    ))
                }
            }
        }
        Ok(options)
    }
}

fn async_body(input: &ItemFn) -> syn::Result<()> {
    if input.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            input.sig.fn_token,
            "core_async attribute macros require `async fn`",
        ));
    }
    Ok(())
}

fn expand_test(input: ItemFn, options: TestOptions) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        mut sig,
        block,
    } = input;
    sig.asyncness = None;

    let runner = if options.start_paused {
        quote!(core_async::runtime::block_on_paused)
    } else {
        quote!(core_async::runtime::block_on)
    };

    quote! {
        #(#attrs)*
        #[test]
        #vis #sig {
            #runner(async move #block)
        }
    }
    .into()
}

fn expand_main(input: ItemFn) -> TokenStream {
    let ItemFn {
        attrs,
        vis,
        mut sig,
        block,
    } = input;
    sig.asyncness = None;

    quote! {
        #(#attrs)*
        #vis #sig {
            core_async::runtime::block_on(async move #block)
        }
    }
    .into()
}
