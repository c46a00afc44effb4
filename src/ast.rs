//  AST.rs
//    by Lut99
//
//  Created:
//    13 Mar 2024, 16:43:37
//  Last edited:
//    16 Oct 2026, 11:02:14
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the logical content stored in a
//!   [`KnowledgeBase`](crate::interpreter::KnowledgeBase): statements, facts,
//!   rules and the provenance that links them together.
//

use std::fmt::{Display, Formatter, Result as FResult};
use std::hash::{Hash, Hasher};

use enum_debug::EnumDebug;
use itertools::Itertools as _;
// Re-export the DSL macro
#[cfg(feature = "macros")]
pub use forward_tms_macros::kb;


/***** HELPER MACROS *****/
/// Stamps out a handle type for one of the two arenas in the knowledge base.
macro_rules! handle {
    ($name:ident, $prefix:literal) => {
        paste::paste! {
            #[doc = concat!("Stable handle to a [`", stringify!($name), "`] owned by a [`KnowledgeBase`](crate::interpreter::KnowledgeBase).\n\nHandles are never re-used within the same knowledge base, so a handle to a removed entry simply stops resolving.")]
            #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
            pub struct [<$name Id>](pub(crate) usize);
            impl [<$name Id>] {
                #[doc = concat!("Returns the raw arena index behind this [`", stringify!($name), "Id`].")]
                #[inline]
                pub const fn index(&self) -> usize { self.0 }
            }
            impl Display for [<$name Id>] {
                #[inline]
                fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, concat!($prefix, "#{}"), self.0) }
            }
            impl From<[<$name Id>]> for EntryId {
                #[inline]
                fn from(value: [<$name Id>]) -> Self { Self::$name(value) }
            }
        }
    };
}

handle!(Fact, "fact");
handle!(Rule, "rule");





/***** LIBRARY *****/
/// Refers to either arena of the knowledge base.
#[derive(Clone, Copy, Debug, EnumDebug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EntryId {
    /// Points to a [`Fact`].
    Fact(FactId),
    /// Points to a [`Rule`].
    Rule(RuleId),
}
impl Display for EntryId {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Fact(id) => id.fmt(f),
            Self::Rule(id) => id.fmt(f),
        }
    }
}



/// A single argument to a [`Statement`].
///
/// # Syntax
/// ```plain
/// tweety
/// ?x
/// ```
#[derive(Clone, Debug, EnumDebug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Term {
    /// A constant, matching only itself.
    Const(String),
    /// A variable, which unification may bind to any term. Stored without its `?`.
    Var(String),
}
impl Term {
    /// Convenience constructor for a [`Term::Const`].
    #[inline]
    pub fn constant(name: impl Into<String>) -> Self { Self::Const(name.into()) }

    /// Convenience constructor for a [`Term::Var`].
    #[inline]
    pub fn var(name: impl Into<String>) -> Self { Self::Var(name.into()) }

    /// Returns whether this term is a [`Term::Var`].
    #[inline]
    pub const fn is_var(&self) -> bool { matches!(self, Self::Var(_)) }

    /// Returns the name of the constant or variable (the latter without its `?`).
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Const(name) | Self::Var(name) => name,
        }
    }
}
impl Display for Term {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Const(name) => write!(f, "{name}"),
            Self::Var(name) => write!(f, "?{name}"),
        }
    }
}

/// The atomic unit of logical content: a predicate applied to zero or more terms.
///
/// Two statements are the same only if they are syntactically identical, variable names
/// included. Use [`unify()`](crate::unify::unify()) to find out if they _could_ be the same.
///
/// # Syntax
/// ```plain
/// (isa tweety bird)
/// (can-fly ?x)
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Statement {
    /// The name of the predicate.
    pub predicate: String,
    /// The arguments given to it.
    pub terms:     Vec<Term>,
}
impl Statement {
    /// Constructor for the Statement.
    ///
    /// # Arguments
    /// - `predicate`: The name of the predicate.
    /// - `terms`: The ordered list of arguments.
    ///
    /// # Returns
    /// A new Statement.
    #[inline]
    pub fn new(predicate: impl Into<String>, terms: impl IntoIterator<Item = Term>) -> Self {
        Self { predicate: predicate.into(), terms: terms.into_iter().collect() }
    }

    /// Returns whether this statement has no variables in it.
    #[inline]
    pub fn is_grounded(&self) -> bool { !self.terms.iter().any(Term::is_var) }

    /// Returns an iterator over the names of the variables in this statement, in order of
    /// occurrence (duplicates included).
    #[inline]
    pub fn vars<'s>(&'s self) -> impl 's + Iterator<Item = &'s str> {
        self.terms.iter().filter_map(|t| match t {
            Term::Var(name) => Some(name.as_str()),
            Term::Const(_) => None,
        })
    }
}
impl Display for Statement {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        if self.terms.is_empty() {
            write!(f, "({})", self.predicate)
        } else {
            write!(f, "({} {})", self.predicate, self.terms.iter().format(" "))
        }
    }
}



/// One derivation that justifies a fact or rule: the fact that matched a rule's first
/// antecedent, and that rule.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Support {
    /// The fact that triggered the derivation.
    pub fact: FactId,
    /// The rule that the fact triggered.
    pub rule: RuleId,
}
impl Support {
    /// Returns whether this derivation used the given entry as one of its premises.
    #[inline]
    pub fn mentions(&self, id: EntryId) -> bool {
        match id {
            EntryId::Fact(fact) => self.fact == fact,
            EntryId::Rule(rule) => self.rule == rule,
        }
    }

    /// Given one premise of this derivation, returns the other one.
    ///
    /// # Returns
    /// The other premise, or [`None`] if `id` isn't one of them.
    #[inline]
    pub fn other(&self, id: EntryId) -> Option<EntryId> {
        match id {
            EntryId::Fact(fact) if self.fact == fact => Some(EntryId::Rule(self.rule)),
            EntryId::Rule(rule) if self.rule == rule => Some(EntryId::Fact(self.fact)),
            _ => None,
        }
    }
}
impl Display for Support {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "[{}, {}]", self.fact, self.rule) }
}

/// The bookkeeping shared by [`Fact`]s and [`Rule`]s: why they hold, and what holds because of
/// them.
///
/// An entry is _live_ iff it is asserted or has at least one derivation supporting it. The
/// knowledge base never stores an entry that isn't.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Provenance {
    /// Whether an external caller declared this entry true.
    pub(crate) asserted:       bool,
    /// Every derivation that currently justifies this entry.
    pub(crate) supported_by:   Vec<Support>,
    /// Facts whose derivation used this entry as a premise.
    pub(crate) supports_facts: Vec<FactId>,
    /// Rules whose derivation used this entry as a premise.
    pub(crate) supports_rules: Vec<RuleId>,
}
impl Provenance {
    /// Creates the provenance of something derived in one particular way.
    #[inline]
    pub(crate) fn derived(support: Support) -> Self { Self { supported_by: vec![support], ..Default::default() } }

    /// Whether an external caller declared this entry true.
    #[inline]
    pub const fn is_asserted(&self) -> bool { self.asserted }

    /// Every derivation that currently justifies this entry, in the order they were found.
    #[inline]
    pub fn supported_by(&self) -> &[Support] { &self.supported_by }

    /// Facts whose derivation used this entry as a premise.
    #[inline]
    pub fn supports_facts(&self) -> &[FactId] { &self.supports_facts }

    /// Rules whose derivation used this entry as a premise.
    #[inline]
    pub fn supports_rules(&self) -> &[RuleId] { &self.supports_rules }

    /// Returns everything this entry helps support, facts first.
    #[inline]
    pub fn dependents<'s>(&'s self) -> impl 's + Iterator<Item = EntryId> {
        self.supports_facts.iter().copied().map(EntryId::Fact).chain(self.supports_rules.iter().copied().map(EntryId::Rule))
    }

    /// Returns whether this entry has a reason to exist.
    #[inline]
    pub fn is_live(&self) -> bool { self.asserted || !self.supported_by.is_empty() }

    /// Appends a derivation, unless this exact one is already recorded.
    ///
    /// # Returns
    /// Whether the derivation was new.
    #[inline]
    pub(crate) fn add_support(&mut self, support: Support) -> bool {
        if self.supported_by.contains(&support) {
            return false;
        }
        self.supported_by.push(support);
        true
    }

    /// Records that the given entry depends on this one, unless already known.
    #[inline]
    pub(crate) fn add_dependent(&mut self, dependent: EntryId) {
        match dependent {
            EntryId::Fact(id) if !self.supports_facts.contains(&id) => self.supports_facts.push(id),
            EntryId::Rule(id) if !self.supports_rules.contains(&id) => self.supports_rules.push(id),
            EntryId::Fact(_) | EntryId::Rule(_) => {},
        }
    }

    /// Forgets that the given entry depends on this one.
    #[inline]
    pub(crate) fn remove_dependent(&mut self, dependent: EntryId) {
        match dependent {
            EntryId::Fact(id) => self.supports_facts.retain(|f| *f != id),
            EntryId::Rule(id) => self.supports_rules.retain(|r| *r != id),
        }
    }

    /// Removes every derivation that used the given entry as a premise.
    ///
    /// # Returns
    /// The derivations that were removed.
    #[inline]
    pub(crate) fn strip_supports(&mut self, premise: EntryId) -> Vec<Support> {
        let (stripped, kept): (Vec<Support>, Vec<Support>) = self.supported_by.drain(..).partition(|s| s.mentions(premise));
        self.supported_by = kept;
        stripped
    }
}



/// A statement that is asserted or derivable as true.
///
/// Equality (and hashing) only considers the [`Statement`]; provenance is bookkeeping.
///
/// # Syntax
/// ```plain
/// fact: (isa tweety bird)
/// ```
#[derive(Clone, Debug)]
pub struct Fact {
    /// The logical content.
    pub(crate) statement: Statement,
    /// Why it holds, and what holds because of it.
    pub(crate) prov: Provenance,
}
impl Fact {
    /// Constructor for a Fact that has no provenance yet.
    ///
    /// Give it to [`KnowledgeBase::assert()`](crate::interpreter::KnowledgeBase::assert()) to
    /// make it hold.
    #[inline]
    pub fn new(statement: Statement) -> Self { Self { statement, prov: Provenance::default() } }

    /// Constructor for a Fact derived in exactly one way.
    #[inline]
    pub(crate) fn derived(statement: Statement, support: Support) -> Self { Self { statement, prov: Provenance::derived(support) } }

    /// The logical content of this fact.
    #[inline]
    pub const fn statement(&self) -> &Statement { &self.statement }

    /// The provenance of this fact.
    #[inline]
    pub const fn provenance(&self) -> &Provenance { &self.prov }

    /// Shorthand for [`Provenance::is_asserted()`].
    #[inline]
    pub const fn is_asserted(&self) -> bool { self.prov.asserted }

    /// Shorthand for [`Provenance::supported_by()`].
    #[inline]
    pub fn supported_by(&self) -> &[Support] { &self.prov.supported_by }
}
impl Eq for Fact {}
impl Hash for Fact {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) { self.statement.hash(state) }
}
impl PartialEq for Fact {
    #[inline]
    fn eq(&self, other: &Self) -> bool { self.statement == other.statement }
}
impl Display for Fact {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "fact: {}", self.statement) }
}
impl From<Statement> for Fact {
    #[inline]
    fn from(value: Statement) -> Self { Self::new(value) }
}

/// An implication: if all antecedents hold (in order), so does the consequent.
///
/// Equality (and hashing) only considers the antecedents and the consequent.
///
/// # Syntax
/// ```plain
/// rule: ((isa ?x bird) (alive ?x)) -> (can-fly ?x)
/// ```
#[derive(Clone, Debug)]
pub struct Rule {
    /// The antecedents (left-hand side).
    pub(crate) lhs:  Vec<Statement>,
    /// The consequent (right-hand side).
    pub(crate) rhs:  Statement,
    /// Why it holds, and what holds because of it.
    pub(crate) prov: Provenance,
}
impl Rule {
    /// Constructor for a Rule that has no provenance yet.
    ///
    /// # Arguments
    /// - `lhs`: The antecedents. A rule without any never fires.
    /// - `rhs`: The consequent.
    #[inline]
    pub fn new(lhs: impl IntoIterator<Item = Statement>, rhs: Statement) -> Self {
        Self { lhs: lhs.into_iter().collect(), rhs, prov: Provenance::default() }
    }

    /// Constructor for a Rule derived in exactly one way.
    #[inline]
    pub(crate) fn derived(lhs: Vec<Statement>, rhs: Statement, support: Support) -> Self { Self { lhs, rhs, prov: Provenance::derived(support) } }

    /// The antecedents of this rule.
    #[inline]
    pub fn lhs(&self) -> &[Statement] { &self.lhs }

    /// The consequent of this rule.
    #[inline]
    pub const fn rhs(&self) -> &Statement { &self.rhs }

    /// The provenance of this rule.
    #[inline]
    pub const fn provenance(&self) -> &Provenance { &self.prov }

    /// Shorthand for [`Provenance::is_asserted()`].
    #[inline]
    pub const fn is_asserted(&self) -> bool { self.prov.asserted }

    /// Shorthand for [`Provenance::supported_by()`].
    #[inline]
    pub fn supported_by(&self) -> &[Support] { &self.prov.supported_by }
}
impl Eq for Rule {}
impl Hash for Rule {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}
impl PartialEq for Rule {
    #[inline]
    fn eq(&self, other: &Self) -> bool { self.lhs == other.lhs && self.rhs == other.rhs }
}
impl Display for Rule {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "rule: ({}) -> {}", self.lhs.iter().format(" "), self.rhs) }
}



/// Anything the knowledge base stores.
#[derive(Clone, Debug, EnumDebug, Eq, Hash, PartialEq)]
pub enum Entry {
    /// It's a [`Fact`].
    Fact(Fact),
    /// It's a [`Rule`].
    Rule(Rule),
}
impl Entry {
    /// The provenance of the wrapped fact or rule.
    #[inline]
    pub const fn provenance(&self) -> &Provenance {
        match self {
            Self::Fact(fact) => &fact.prov,
            Self::Rule(rule) => &rule.prov,
        }
    }

    /// Mutable access to the provenance of the wrapped fact or rule.
    #[inline]
    pub(crate) fn provenance_mut(&mut self) -> &mut Provenance {
        match self {
            Self::Fact(fact) => &mut fact.prov,
            Self::Rule(rule) => &mut rule.prov,
        }
    }

    /// Returns the wrapped fact, if this is one.
    #[inline]
    pub const fn as_fact(&self) -> Option<&Fact> {
        match self {
            Self::Fact(fact) => Some(fact),
            Self::Rule(_) => None,
        }
    }

    /// Returns the wrapped rule, if this is one.
    #[inline]
    pub const fn as_rule(&self) -> Option<&Rule> {
        match self {
            Self::Fact(_) => None,
            Self::Rule(rule) => Some(rule),
        }
    }
}
impl Display for Entry {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Fact(fact) => fact.fmt(f),
            Self::Rule(rule) => rule.fmt(f),
        }
    }
}
impl From<Fact> for Entry {
    #[inline]
    fn from(value: Fact) -> Self { Self::Fact(value) }
}
impl From<Rule> for Entry {
    #[inline]
    fn from(value: Rule) -> Self { Self::Rule(value) }
}
impl From<Statement> for Entry {
    #[inline]
    fn from(value: Statement) -> Self { Self::Fact(Fact::new(value)) }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{make_fact, make_rule, make_stmt};


    #[test]
    fn test_statement_display() {
        assert_eq!(make_stmt("isa", ["tweety", "bird"]).to_string(), "(isa tweety bird)");
        assert_eq!(make_stmt("can-fly", ["?x"]).to_string(), "(can-fly ?x)");
        assert_eq!(make_stmt("raining", []).to_string(), "(raining)");
    }

    #[test]
    fn test_statement_structural_equality() {
        assert_eq!(make_stmt("isa", ["?x", "bird"]), make_stmt("isa", ["?x", "bird"]));
        // Unifiable is not the same as equal
        assert_ne!(make_stmt("isa", ["?x", "bird"]), make_stmt("isa", ["?y", "bird"]));
        assert_ne!(make_stmt("isa", ["tweety", "bird"]), make_stmt("isa", ["?x", "bird"]));
        assert!(make_stmt("isa", ["tweety", "bird"]).is_grounded());
        assert!(!make_stmt("isa", ["?x", "bird"]).is_grounded());
        assert_eq!(make_stmt("likes", ["?x", "?y", "?x"]).vars().collect::<Vec<_>>(), vec!["x", "y", "x"]);
    }

    #[test]
    fn test_entry_equality_ignores_provenance() {
        let mut asserted = make_fact("isa", ["tweety", "bird"]);
        asserted.prov.asserted = true;
        assert_eq!(asserted, make_fact("isa", ["tweety", "bird"]));

        let rule = make_rule([("isa", vec!["?x", "bird"])], ("can-fly", vec!["?x"]));
        assert_eq!(rule.to_string(), "rule: ((isa ?x bird)) -> (can-fly ?x)");
        assert_ne!(rule, make_rule([("isa", vec!["?x", "fish"])], ("can-fly", vec!["?x"])));
    }

    #[test]
    fn test_provenance_strip_supports() {
        let (f0, f1, r0, r1) = (FactId(0), FactId(1), RuleId(0), RuleId(1));
        let mut prov = Provenance::derived(Support { fact: f0, rule: r0 });
        assert!(prov.add_support(Support { fact: f1, rule: r1 }));
        assert!(!prov.add_support(Support { fact: f1, rule: r1 }));
        assert!(prov.add_support(Support { fact: f0, rule: r1 }));

        let stripped = prov.strip_supports(EntryId::Fact(f0));
        assert_eq!(stripped, vec![Support { fact: f0, rule: r0 }, Support { fact: f0, rule: r1 }]);
        assert_eq!(prov.supported_by(), &[Support { fact: f1, rule: r1 }]);
        assert!(prov.is_live());
        assert_eq!(stripped[1].other(EntryId::Fact(f0)), Some(EntryId::Rule(r1)));
        assert_eq!(stripped[1].other(EntryId::Fact(f1)), None);
    }
}
