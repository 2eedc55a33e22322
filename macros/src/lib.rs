use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

/// Marks a test for the rxlite crate.
///
/// - `#[rxlite_macro::test]` on a sync fn expands to a plain `#[test]`.
/// - `#[rxlite_macro::test(local)]` on an async fn runs the body inside a
///   `tokio::task::LocalSet` on a current-thread runtime whose clock starts
///   paused, so `LocalScheduler` timers resolve deterministically.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let raw_args = proc_macro2::TokenStream::from(attr);

  if !raw_args.is_empty() {
    if !is_async {
      return syn::Error::new(
        raw_args.span(),
        "rxlite_macro::test flavor args are only supported for async tests. Use \
         #[rxlite_macro::test] for sync tests, or make the function async.",
      )
      .to_compile_error()
      .into();
    }
    let flavor = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      ident.to_string()
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      lit.value()
    } else {
      String::new()
    };
    if flavor != "local" {
      return syn::Error::new(
        raw_args.span(),
        "rxlite_macro::test only accepts: #[rxlite_macro::test] or #[rxlite_macro::test(local)]",
      )
      .to_compile_error()
      .into();
    }
  }

  if !is_async {
    return quote!(#[test] #input).into();
  }

  let ItemFn { attrs, vis, mut sig, block } = input;
  sig.asyncness = None;
  let expanded = quote! {
    #[test]
    #(#attrs)*
    #vis #sig {
      tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("failed to build the test runtime")
        .block_on(tokio::task::LocalSet::new().run_until(async move #block))
    }
  };
  expanded.into()
}
