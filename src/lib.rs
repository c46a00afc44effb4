//  LIB.rs
//    by Lut99
//
//  Created:
//    13 Mar 2024, 16:43:01
//  Last edited:
//    16 Oct 2026, 15:10:52
//  Auto updated?
//    Yes
//
//  Description:
//!   A forward-chaining inference engine over a knowledge base of facts
//!   and rules, with truth maintenance: everything derived remembers what
//!   it was derived from, and is retracted when that goes away.
//!
//!   # Example
//!   ```rust
//!   use forward_tms::ast::{Fact, Rule, Statement, Term};
//!   use forward_tms::interpreter::KnowledgeBase;
//!
//!   let mut kb = KnowledgeBase::new();
//!   kb.assert(Rule::new(
//!       [Statement::new("isa", [Term::var("x"), Term::constant("bird")])],
//!       Statement::new("can-fly", [Term::var("x")]),
//!   ));
//!   kb.assert(Fact::new(Statement::new("isa", [Term::constant("tweety"), Term::constant("bird")])));
//!
//!   let flies = Statement::new("can-fly", [Term::constant("tweety")]);
//!   assert_eq!(kb.ask(flies.clone()).len(), 1);
//!
//!   kb.retract(Statement::new("isa", [Term::constant("tweety"), Term::constant("bird")])).unwrap();
//!   assert!(kb.ask(flies).is_empty());
//!   ```
//

// Declare modules
pub mod ast;
#[cfg(feature = "interpreter")]
pub mod interpreter;
mod log;
#[cfg(test)]
mod tests;
pub mod unify;
