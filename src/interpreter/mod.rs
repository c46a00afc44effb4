//  MOD.rs
//    by Lut99
//
//  Created:
//    26 Mar 2024, 19:36:31
//  Last edited:
//    16 Oct 2026, 15:02:10
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements a forward-chaining reasoner with truth maintenance.
//!
//!   Every [`Fact`] and [`Rule`] in a [`KnowledgeBase`] records why it holds:
//!   because it was asserted, because the [`InferenceEngine`] derived it
//!   from some fact and rule, or both. When something stops holding, so
//!   does everything that only held because of it.
//!
//!   Derivation works by matching a fact against the _first_ antecedent of
//!   a rule. If the rule has only one, its consequent is derived as a new
//!   fact; otherwise, a new rule is derived with the remaining antecedents,
//!   which waits for the next fact to come along.
//

// Nested modules
mod knowledge_base;

// Imports
pub use knowledge_base::{Answer, CycleError, InconsistencyError, KnowledgeBase, Retraction};

use crate::ast::{Entry, EntryId, Fact, FactId, Rule, RuleId, Statement, Support};
use crate::log::trace;
use crate::unify::{Bindings, instantiate, unify};


/***** AUXILLARY *****/
/// Configures how much a [`KnowledgeBase`] tells about its reasoning.
///
/// Both options only have an effect if the `log`-feature is enabled, and then only on the
/// `trace`-level.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Whether to trace every attempted derivation.
    pub trace_inference:  bool,
    /// Whether to trace every step of a retraction cascade.
    pub trace_retraction: bool,
}
impl Config {
    /// Returns a Config that traces everything.
    #[inline]
    pub const fn verbose() -> Self { Self { trace_inference: true, trace_retraction: true } }
}





/***** LIBRARY *****/
/// Derives new facts and rules from a fact and a rule.
///
/// The engine itself is stateless; it reads its premises from, and writes its conclusions to, the
/// [`KnowledgeBase`] it's given.
#[derive(Clone, Copy, Debug, Default)]
pub struct InferenceEngine;
impl InferenceEngine {
    /// Attempts to derive something from a fact and a rule.
    ///
    /// The fact is unified with the rule's first antecedent. If that succeeds, then:
    /// - if the rule has no other antecedents, its consequent is instantiated and added as a fact;
    /// - otherwise, a rule with the remaining antecedents (and the consequent) is instantiated
    ///   and added.
    ///
    /// Either way, the conclusion is supported by `(fact, rule)`, and both learn that they support
    /// it. Adding the conclusion may trigger further derivations.
    ///
    /// # Arguments
    /// - `fact`: The fact to match. Must be live in `kb`.
    /// - `rule`: The rule to match against. Must be live in `kb`.
    /// - `kb`: The [`KnowledgeBase`] to derive in.
    ///
    /// # Returns
    /// The handle of the conclusion, or [`None`] if nothing could be derived.
    pub fn infer(&self, fact: FactId, rule: RuleId, kb: &mut KnowledgeBase) -> Option<EntryId> {
        let (fact_ref, rule_ref): (&Fact, &Rule) = (kb.fact(fact)?, kb.rule(rule)?);
        if kb.config().trace_inference {
            trace!("Attempting to infer from {fact_ref} and {rule_ref}");
        }

        // Match with the first antecedent
        let first: &Statement = rule_ref.lhs.first()?;
        let bindings: Bindings = unify(&fact_ref.statement, first)?;
        let support = Support { fact, rule };
        let conclusion: Entry = if rule_ref.lhs.len() == 1 {
            Entry::Fact(Fact::derived(instantiate(&rule_ref.rhs, &bindings), support))
        } else {
            Entry::Rule(Rule::derived(
                rule_ref.lhs[1..].iter().map(|s| instantiate(s, &bindings)).collect(),
                instantiate(&rule_ref.rhs, &bindings),
                support,
            ))
        };
        if kb.config().trace_inference {
            trace!("Derived {conclusion} (bindings: {bindings})");
        }

        // Add it, then make sure the premises know about it
        let id: EntryId = kb.add(conclusion);
        kb.link(support, id);
        Some(id)
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{make_fact, make_rule, make_stmt};


    #[test]
    fn test_infer_mismatch_changes_nothing() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let mut kb = KnowledgeBase::with_config(Config::verbose());
        kb.assert(make_fact("isa", ["nemo", "fish"]));
        kb.assert(make_rule([("isa", vec!["?x", "bird"])], ("can-fly", vec!["?x"])));
        let (fact, _) = kb.facts().next().unwrap();
        let (rule, _) = kb.rules().next().unwrap();

        assert_eq!(InferenceEngine.infer(fact, rule, &mut kb), None);
        assert_eq!(kb.facts().len(), 1);
        assert!(kb.fact(fact).unwrap().provenance().supports_facts().is_empty());
        assert_eq!(kb.validate(), Ok(()));
    }

    #[test]
    fn test_infer_is_idempotent() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let mut kb = KnowledgeBase::new();
        kb.assert(make_rule([("isa", vec!["?x", "bird"])], ("can-fly", vec!["?x"])));
        kb.assert(make_fact("isa", ["tweety", "bird"]));
        let (fact, _) = kb.facts().next().unwrap();
        let (rule, _) = kb.rules().next().unwrap();
        let flies = kb.find_fact(&make_stmt("can-fly", ["tweety"])).unwrap();

        // Firing the same pair again lands on the same fact, with the same single derivation
        assert_eq!(InferenceEngine.infer(fact, rule, &mut kb), Some(EntryId::Fact(flies)));
        assert_eq!(kb.fact(flies).unwrap().supported_by(), &[Support { fact, rule }]);
        assert_eq!(kb.fact(fact).unwrap().provenance().supports_facts(), &[flies]);
        assert_eq!(kb.validate(), Ok(()));
    }

    #[test]
    fn test_infer_binds_across_antecedents() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let mut kb = KnowledgeBase::new();
        kb.assert(make_rule([("parent", vec!["?x", "?y"]), ("parent", vec!["?y", "?z"])], ("grandparent", vec!["?x", "?z"])));
        kb.assert(make_fact("parent", ["ann", "bob"]));

        // The binding of `?y` carries over into the remaining antecedent
        let special = kb.find_rule(&[make_stmt("parent", ["bob", "?z"])], &make_stmt("grandparent", ["ann", "?z"]));
        assert!(special.is_some());

        kb.assert(make_fact("parent", ["bob", "cid"]));
        assert!(kb.find_fact(&make_stmt("grandparent", ["ann", "cid"])).is_some());
        assert!(kb.find_fact(&make_stmt("grandparent", ["bob", "cid"])).is_none());
    }

    #[test]
    fn test_infer_ignores_rule_without_antecedents() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let mut kb = KnowledgeBase::new();
        kb.assert(Rule::new([], make_stmt("raining", [])));
        kb.assert(make_fact("raining", []));
        let (fact, _) = kb.facts().next().unwrap();
        let (rule, _) = kb.rules().next().unwrap();
        assert_eq!(InferenceEngine.infer(fact, rule, &mut kb), None);
        assert!(kb.fact(fact).unwrap().supported_by().is_empty());
    }

    #[cfg(feature = "macros")]
    #[test]
    fn test_kb_macro_tweety() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let kb = KnowledgeBase::from_entries(crate::ast::kb! {
            #![crate]
            isa(tweety, bird).
            isa(polly, bird).
            "can-fly"(?x) :- isa(?x, bird).
            sings(?x) :- isa(?x, bird), happy(?x).
            happy(polly).
        });
        assert_eq!(kb.ask(make_stmt("can-fly", ["?who"])).len(), 2);
        let singers = kb.ask(make_stmt("sings", ["?who"]));
        assert_eq!(singers.len(), 1);
        assert_eq!(singers[0].bindings.to_string(), "?who : polly");
        assert_eq!(kb.validate(), Ok(()));
    }
}
