//  UNIFY.rs
//    by Lut99
//
//  Created:
//    03 Dec 2024, 17:58:01
//  Last edited:
//    16 Oct 2026, 11:20:43
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the matching substrate of the inference engine: unifying
//!   two [`Statement`]s into a set of [`Bindings`], and instantiating a
//!   template statement with them.
//!
//!   Statements are flat (their terms are either constants or variables),
//!   so there is no occurs-check to speak of.
//

use std::fmt::{Display, Formatter, Result as FResult};

use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::ast::{Statement, Term};


/***** LIBRARY FUNCTIONS *****/
/// Attempts to unify two statements.
///
/// Variables on either side may be bound, either to constants or to each other. Both sides share
/// the same variable namespace.
///
/// # Arguments
/// - `lhs`: The first [`Statement`]. Its variables are considered first when binding.
/// - `rhs`: The second [`Statement`].
///
/// # Returns
/// The [`Bindings`] that make both statements equal, or [`None`] if there are none. Note that two
/// identical, grounded statements unify with an empty set of bindings.
pub fn unify(lhs: &Statement, rhs: &Statement) -> Option<Bindings> {
    if lhs.predicate != rhs.predicate || lhs.terms.len() != rhs.terms.len() {
        return None;
    }

    let mut bindings = Bindings::new();
    for (l, r) in lhs.terms.iter().zip(rhs.terms.iter()) {
        let bound: bool = match (l, r) {
            (Term::Var(var), other) => bindings.test_and_bind(var, other),
            (other, Term::Var(var)) => bindings.test_and_bind(var, other),
            (Term::Const(l), Term::Const(r)) => l == r,
        };
        if !bound {
            return None;
        }
    }
    Some(bindings)
}

/// Substitutes every bound variable in a template statement.
///
/// Variables are replaced by whatever they're bound to, once; unbound variables are left as-is.
///
/// # Arguments
/// - `template`: The [`Statement`] to instantiate. Is not touched.
/// - `bindings`: The [`Bindings`] to instantiate with.
///
/// # Returns
/// A new [`Statement`].
pub fn instantiate(template: &Statement, bindings: &Bindings) -> Statement {
    Statement {
        predicate: template.predicate.clone(),
        terms:     template
            .terms
            .iter()
            .map(|t| match t {
                Term::Var(var) => bindings.get(var).cloned().unwrap_or_else(|| t.clone()),
                Term::Const(_) => t.clone(),
            })
            .collect(),
    }
}





/***** LIBRARY *****/
/// Maps variables to the terms they are bound to, in the order they got bound.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Bindings {
    /// The bindings themselves, keyed by variable name (without `?`).
    map: IndexMap<String, Term>,
}
impl Bindings {
    /// Constructor for an empty set of Bindings.
    #[inline]
    pub fn new() -> Self { Self { map: IndexMap::new() } }

    /// Binds a variable, unless it's already bound to something else.
    ///
    /// # Arguments
    /// - `var`: The name of the variable (without `?`).
    /// - `term`: The [`Term`] to bind it to.
    ///
    /// # Returns
    /// True if the variable is now bound to `term`, false if it was already bound to another term.
    pub fn test_and_bind(&mut self, var: &str, term: &Term) -> bool {
        match self.map.get(var) {
            Some(bound) => bound == term,
            None => {
                self.map.insert(var.into(), term.clone());
                true
            },
        }
    }

    /// Returns what the given variable is bound to.
    ///
    /// # Arguments
    /// - `var`: The name of the variable (without `?`).
    #[inline]
    pub fn get(&self, var: &str) -> Option<&Term> { self.map.get(var) }

    /// The number of bound variables.
    #[inline]
    pub fn len(&self) -> usize { self.map.len() }

    /// Whether no variables are bound.
    #[inline]
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    /// Iterates over `(variable, term)` pairs in binding order.
    #[inline]
    pub fn iter<'s>(&'s self) -> impl 's + Iterator<Item = (&'s str, &'s Term)> { self.map.iter().map(|(k, v)| (k.as_str(), v)) }
}
impl Display for Bindings {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        write!(f, "{}", self.map.iter().format_with(", ", |(var, term), f| f(&format_args!("?{var} : {term}"))))
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::make_stmt;


    #[test]
    fn test_unify_binds_variables() {
        let bindings = unify(&make_stmt("isa", ["tweety", "bird"]), &make_stmt("isa", ["?x", "bird"])).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get("x"), Some(&Term::constant("tweety")));
        assert_eq!(bindings.to_string(), "?x : tweety");

        // Both directions work
        let bindings = unify(&make_stmt("isa", ["?x", "bird"]), &make_stmt("isa", ["tweety", "?y"])).unwrap();
        assert_eq!(bindings.get("x"), Some(&Term::constant("tweety")));
        assert_eq!(bindings.get("y"), Some(&Term::constant("bird")));
        assert_eq!(bindings.to_string(), "?x : tweety, ?y : bird");
    }

    #[test]
    fn test_unify_mismatches() {
        assert_eq!(unify(&make_stmt("isa", ["tweety", "bird"]), &make_stmt("isa", ["tweety", "fish"])), None);
        assert_eq!(unify(&make_stmt("isa", ["tweety", "bird"]), &make_stmt("has", ["tweety", "bird"])), None);
        assert_eq!(unify(&make_stmt("isa", ["tweety"]), &make_stmt("isa", ["tweety", "bird"])), None);
        // Repeated variables must agree
        assert_eq!(unify(&make_stmt("likes", ["alice", "bob"]), &make_stmt("likes", ["?x", "?x"])), None);
        assert!(unify(&make_stmt("likes", ["bob", "bob"]), &make_stmt("likes", ["?x", "?x"])).is_some());
    }

    #[test]
    fn test_unify_ground_is_empty_success() {
        let bindings = unify(&make_stmt("isa", ["tweety", "bird"]), &make_stmt("isa", ["tweety", "bird"])).unwrap();
        assert!(bindings.is_empty());
        assert!(unify(&make_stmt("raining", []), &make_stmt("raining", [])).is_some());
    }

    #[test]
    fn test_unify_var_to_var() {
        let bindings = unify(&make_stmt("p", ["?a"]), &make_stmt("p", ["?b"])).unwrap();
        assert_eq!(bindings.get("a"), Some(&Term::var("b")));
        assert_eq!(bindings.get("b"), None);
    }

    #[test]
    fn test_instantiate() {
        let template = make_stmt("between", ["?x", "?y", "?z"]);
        let mut bindings = Bindings::new();
        assert!(bindings.test_and_bind("x", &Term::constant("a")));
        assert!(bindings.test_and_bind("z", &Term::constant("c")));
        assert!(!bindings.test_and_bind("x", &Term::constant("b")));

        let inst = instantiate(&template, &bindings);
        assert_eq!(inst, make_stmt("between", ["a", "?y", "c"]));
        // The template is untouched
        assert_eq!(template, make_stmt("between", ["?x", "?y", "?z"]));
        // Constants and empty bindings are no-ops
        assert_eq!(instantiate(&make_stmt("isa", ["tweety", "bird"]), &Bindings::new()), make_stmt("isa", ["tweety", "bird"]));
    }
}
