//  KB.rs
//    by Lut99
//
//  Created:
//    03 Dec 2024, 10:46:29
//  Last edited:
//    16 Oct 2026, 15:41:07
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the [`kb!()`]-macro.
//!
//!   # Syntax
//!   ```plain
//!   #![crate]                              // optional; refer to `crate` instead of `::forward_tms`
//!   isa(tweety, bird).                     // a fact
//!   "can-fly"(?x) :- isa(?x, bird).        // a rule (consequent first)
//!   sings(?x) :- isa(?x, bird), happy(?x). // rules may have more antecedents
//!   raining.                               // statements need no arguments
//!   ```
//

use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, quote_spanned};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::token::{Comma, Paren};
use syn::{Error, Ident, LitInt, LitStr, Token, bracketed, parenthesized};


/***** AST *****/
/// The inner attributes given to the macro.
struct KbAttributes {
    /// The path to the `forward-tms`-crate.
    crate_path: TokenStream2,
}
impl Parse for KbAttributes {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if !(input.peek(Token![#]) && input.peek2(Token![!])) {
            return Ok(Self { crate_path: quote! { ::forward_tms } });
        }
        input.parse::<Token![#]>()?;
        input.parse::<Token![!]>()?;
        let content;
        bracketed!(content in input);
        let krate: Token![crate] = content.parse()?;
        if !content.is_empty() {
            return Err(content.error("Unknown attribute; only `#![crate]` is supported"));
        }
        Ok(Self { crate_path: quote_spanned! { krate.span => crate } })
    }
}

/// A plain identifier, an integer or a string literal (for names that aren't valid identifiers).
struct Name {
    /// The name itself.
    value: String,
    /// Where it was written.
    span:  Span,
}
impl Parse for Name {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            Ok(Self { value: lit.value(), span: lit.span() })
        } else if lookahead.peek(LitInt) {
            let lit: LitInt = input.parse()?;
            Ok(Self { value: lit.base10_digits().into(), span: lit.span() })
        } else if lookahead.peek(Ident) {
            let ident: Ident = input.parse()?;
            Ok(Self { value: ident.to_string(), span: ident.span() })
        } else {
            Err(lookahead.error())
        }
    }
}

/// One argument to a statement.
enum Term {
    /// `?x`
    Var(Name),
    /// `tweety`, `42` or `"can-fly"`
    Const(Name),
}
impl Parse for Term {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(Token![?]) {
            input.parse::<Token![?]>()?;
            let ident: Ident = input.parse()?;
            return Ok(Self::Var(Name { value: ident.to_string(), span: ident.span() }));
        }
        Ok(Self::Const(input.parse()?))
    }
}

/// A predicate with its arguments.
struct Statement {
    /// The predicate's name.
    name:  Name,
    /// Any arguments.
    terms: Vec<Term>,
}
impl Parse for Statement {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: Name = input.parse()?;
        let terms: Vec<Term> = if input.peek(Paren) {
            let content;
            parenthesized!(content in input);
            Punctuated::<Term, Comma>::parse_terminated(&content)?.into_iter().collect()
        } else {
            Vec::new()
        };
        Ok(Self { name, terms })
    }
}

/// Something that ends in a dot.
enum Item {
    /// `stmt.`
    Fact(Statement),
    /// `stmt :- stmt, ... .`
    Rule(Statement, Vec<Statement>),
}
impl Parse for Item {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let head: Statement = input.parse()?;
        if input.peek(Token![.]) {
            input.parse::<Token![.]>()?;
            return Ok(Self::Fact(head));
        }

        // Else it should be a rule
        if !input.peek(Token![:]) {
            return Err(input.error("Expected either `.` or `:-`"));
        }
        input.parse::<Token![:]>()?;
        input.parse::<Token![-]>()?;
        let mut body: Vec<Statement> = vec![input.parse()?];
        while input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            body.push(input.parse()?);
        }
        input.parse::<Token![.]>()?;
        Ok(Self::Rule(head, body))
    }
}





/***** SERIALIZATION *****/
/// Serializes a [`Term`] as a `forward_tms::ast::Term`.
fn serialize_term(crate_path: &TokenStream2, term: &Term) -> TokenStream2 {
    let (variant, name): (TokenStream2, &Name) = match term {
        Term::Var(name) => (quote! { Var }, name),
        Term::Const(name) => (quote! { Const }, name),
    };
    let value: &str = &name.value;
    quote_spanned! { name.span => #crate_path::ast::Term::#variant(::std::string::String::from(#value)) }
}

/// Serializes a [`Statement`] as a `forward_tms::ast::Statement`.
fn serialize_stmt(crate_path: &TokenStream2, stmt: &Statement) -> TokenStream2 {
    let name: &str = &stmt.name.value;
    let terms = stmt.terms.iter().map(|t| serialize_term(crate_path, t));
    quote_spanned! { stmt.name.span => #crate_path::ast::Statement::new(#name, ::std::vec![#(#terms),*]) }
}

/// Serializes an [`Item`] as a `forward_tms::ast::Entry`.
fn serialize_item(crate_path: &TokenStream2, item: &Item) -> TokenStream2 {
    match item {
        Item::Fact(stmt) => {
            let stmt_tokens = serialize_stmt(crate_path, stmt);
            quote_spanned! { stmt.name.span => #crate_path::ast::Entry::Fact(#crate_path::ast::Fact::new(#stmt_tokens)) }
        },
        Item::Rule(head, body) => {
            let rhs = serialize_stmt(crate_path, head);
            let lhs = body.iter().map(|s| serialize_stmt(crate_path, s));
            quote_spanned! { head.name.span => #crate_path::ast::Entry::Rule(#crate_path::ast::Rule::new(::std::vec![#(#lhs),*], #rhs)) }
        },
    }
}





/***** LIBRARY *****/
/// Implements the `kb!()`-macro.
///
/// # Arguments
/// - `input`: The input tokens to parse, as a [`ParseStream`].
///
/// # Returns
/// A [`TokenStream2`] that builds a `Vec<forward_tms::ast::Entry>`, in the order the facts and
/// rules were written.
///
/// # Errors
/// This function may error if the input is not a sequence of facts and rules.
pub fn kb(input: ParseStream) -> Result<TokenStream2, Error> {
    let attrs: KbAttributes = input.parse()?;
    let crate_path: &TokenStream2 = &attrs.crate_path;

    let mut entries: Vec<TokenStream2> = Vec::new();
    while !input.is_empty() {
        let item: Item = input.parse()?;
        entries.push(serialize_item(crate_path, &item));
    }

    Ok(quote! {
        {
            let entries: ::std::vec::Vec<#crate_path::ast::Entry> = ::std::vec![#(#entries),*];
            entries
        }
    })
}
