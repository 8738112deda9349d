//! Procedural macros shared by the tenure crates.
//!
//! The only macro right now is [`macro@context`], which attaches a formatted
//! message to every error leaving a function that returns `anyhow::Result`.

mod args;

use args::ContextArgs;
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{Block, ItemFn, ReturnType, parse_macro_input, parse_quote};

/// Wraps the body of a function so that an `Err` gets `.context(format!(...))` applied.
///
/// The arguments are passed to `format!` as-is and may reference the function
/// parameters. Prefix them with `move,` when the body needs to consume its
/// arguments:
///
/// ```ignore
/// #[context("while decoding geometry {:?}", raw)]
/// fn decode(raw: &str) -> anyhow::Result<Geometry> { ... }
/// ```
///
/// Only synchronous functions with an explicit return type are accepted.
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = parse_macro_input!(args as ContextArgs);
	let function = parse_macro_input!(input as ItemFn);
	match expand(args, function) {
		Ok(function) => function.into_token_stream().into(),
		Err(err) => err.to_compile_error().into(),
	}
}

fn expand(args: ContextArgs, mut function: ItemFn) -> syn::Result<ItemFn> {
	if let Some(asyncness) = &function.sig.asyncness {
		return Err(syn::Error::new_spanned(asyncness, "#[context] does not support async functions"));
	}
	let output = match &function.sig.output {
		ReturnType::Default => {
			return Err(syn::Error::new_spanned(
				&function.sig,
				"#[context] requires a function returning Result",
			));
		}
		output @ ReturnType::Type(..) => output.clone(),
	};

	let ContextArgs { move_token, message } = args;
	let body = &function.block;
	let err = Ident::new("err", Span::mixed_site());
	let call_once = Ident::new("call_once", Span::mixed_site());

	// The body runs as a closure so that `?` stays inside it. Passing it
	// through an `FnOnce` bound lets the body move out of its captures.
	let wrapped: TokenStream2 = quote! {
		fn #call_once<R>(f: impl ::core::ops::FnOnce() -> R) -> R {
			f()
		}
		#call_once(#move_token || #output #body)
			.map_err(|#err| #err.context(format!(#message)).into())
	};
	let block: Block = parse_quote!({ #wrapped });
	function.block = Box::new(block);
	Ok(function)
}
