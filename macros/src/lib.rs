//  LIB.rs
//    by Lut99
//
//  Created:
//    18 Mar 2024, 13:25:32
//  Last edited:
//    16 Oct 2026, 15:42:19
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the `kb!{}`-macro for the `forward-tms`-crate.
//

// Modules
mod kb;

// Imports
use proc_macro::TokenStream;
use syn::parse::Parser as _;


/***** LIBRARY *****/
/// Writes down a list of facts and rules in a Prolog-like notation.
///
/// Evaluates to a `Vec<forward_tms::ast::Entry>`, which can be given to
/// `KnowledgeBase::from_entries()`.
///
/// # Example
/// ```ignore
/// let entries = kb! {
///     isa(tweety, bird).
///     "can-fly"(?x) :- isa(?x, bird).
/// };
/// ```
#[proc_macro]
pub fn kb(input: TokenStream) -> TokenStream {
    match kb::kb.parse2(input.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
