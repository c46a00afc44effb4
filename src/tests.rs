//  TESTS.rs
//    by Lut99
//
//  Created:
//    03 Dec 2024, 14:32:43
//  Last edited:
//    16 Oct 2026, 11:08:30
//  Auto updated?
//    Yes
//
//  Description:
//!   Contains some common test functions.
//

#![allow(unused)]

use crate::ast::{Fact, Rule, Statement, Term};


/***** LIBRARY *****/
/// Sets up a logger if wanted.
#[cfg(feature = "log")]
pub fn setup_logger() {
    use humanlog::{DebugMode, HumanLogger};

    // Check if the envs tell us to
    if let Ok(logger) = std::env::var("LOGGER") {
        if logger == "1" || logger == "true" {
            // Create the logger
            if let Err(err) = HumanLogger::terminal(DebugMode::Full).init() {
                eprintln!("WARNING: Failed to setup logger: {err} (no logging for this session)");
            }
        }
    }
}



/// Makes a [`Statement`] conveniently.
///
/// Arguments starting with `?` become variables, the rest constants.
#[track_caller]
pub fn make_stmt(name: &'static str, args: impl IntoIterator<Item = &'static str>) -> Statement {
    Statement::new(
        name,
        args.into_iter().map(|arg| {
            if arg.is_empty() {
                panic!("Empty argument given");
            }
            match arg.strip_prefix('?') {
                Some(var) => Term::var(var),
                None => Term::constant(arg),
            }
        }),
    )
}

/// Makes a [`Fact`] conveniently.
#[track_caller]
#[inline]
pub fn make_fact(name: &'static str, args: impl IntoIterator<Item = &'static str>) -> Fact { Fact::new(make_stmt(name, args)) }

/// Makes a [`Rule`] conveniently.
#[track_caller]
pub fn make_rule(lhs: impl IntoIterator<Item = (&'static str, Vec<&'static str>)>, rhs: (&'static str, Vec<&'static str>)) -> Rule {
    Rule::new(lhs.into_iter().map(|(name, args)| make_stmt(name, args)), make_stmt(rhs.0, rhs.1))
}
