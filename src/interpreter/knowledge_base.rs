//  KNOWLEDGE BASE.rs
//    by Lut99
//
//  Created:
//    03 Feb 2025, 17:11:26
//  Last edited:
//    16 Oct 2026, 14:37:51
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the [`KnowledgeBase`], which owns every live [`Fact`] and
//!   [`Rule`], drives the [`InferenceEngine`] whenever something new is
//!   added, and unwinds derivations again when their premises are
//!   retracted.
//!
//!   Facts and rules live in two arenas and refer to each other by
//!   [`FactId`]/[`RuleId`]. Removing something is a matter of pruning these
//!   handles elsewhere and dropping the arena slot.
//

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter, Result as FResult};

use enum_debug::EnumDebug;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools as _;

use super::{Config, InferenceEngine};
use crate::ast::{Entry, EntryId, Fact, FactId, Provenance, Rule, RuleId, Statement, Support};
use crate::log::{debug, trace, warn};
use crate::unify::{Bindings, unify};


/***** ERRORS *****/
/// A retraction cascade ran into an entry that it was already in the middle of removing.
///
/// This means some entry (transitively) supports itself, which the knowledge base never builds
/// on its own. After this error, the contents of the knowledge base are unspecified.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleError {
    /// The entry that would have been removed twice.
    pub entry: EntryId,
    /// The chain of removals that was in progress, outermost first.
    pub chain: Vec<EntryId>,
}
impl Display for CycleError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        write!(f, "Provenance cycle: {} supports itself (removal chain: {} -> {})", self.entry, self.chain.iter().format(" -> "), self.entry)
    }
}
impl Error for CycleError {}

/// Describes how a [`KnowledgeBase`] violates its own invariants.
#[derive(Clone, Debug, EnumDebug, Eq, PartialEq)]
pub enum InconsistencyError {
    /// An entry is neither asserted nor supported.
    NotLive { entry: EntryId },
    /// An entry is not (or not uniquely) reachable through the equality index.
    Unindexed { entry: EntryId },
    /// An entry is supported by a derivation whose premises are gone.
    DanglingSupport { entry: EntryId, support: Support },
    /// A premise of a derivation does not know that it supports the derived entry.
    MissingBacklink { entry: EntryId, premise: EntryId },
    /// An entry claims to support something that isn't derived from it.
    StaleBacklink { entry: EntryId, dependent: EntryId },
}
impl Display for InconsistencyError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::NotLive { entry } => write!(f, "{entry} is neither asserted nor supported"),
            Self::Unindexed { entry } => write!(f, "{entry} is not uniquely indexed by its content"),
            Self::DanglingSupport { entry, support } => write!(f, "{entry} is supported by {support}, which refers to removed entries"),
            Self::MissingBacklink { entry, premise } => write!(f, "{premise} is a premise of {entry} but does not list it as supported"),
            Self::StaleBacklink { entry, dependent } => write!(f, "{entry} lists {dependent} as supported, but it isn't derived from it"),
        }
    }
}
impl Error for InconsistencyError {}





/***** HELPER FUNCTIONS *****/
/// Merges the provenance of an incoming duplicate into the one already stored.
///
/// Derivations are appended; an incoming entry without any counts as an assertion.
fn merge(into: &mut Provenance, from: Provenance) {
    if from.supported_by.is_empty() {
        into.asserted = true;
    } else {
        for support in from.supported_by {
            into.add_support(support);
        }
    }
}

/// Returns the marker used to show how an entry holds when printing.
#[inline]
fn marker(prov: &Provenance) -> char { if prov.asserted { '+' } else { '~' } }





/***** AUXILLARY *****/
/// One answer to [`KnowledgeBase::ask()`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Answer {
    /// The bindings that make the query equal to the fact.
    pub bindings: Bindings,
    /// The fact that matched.
    pub fact:     FactId,
}
impl Display for Answer {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{} (by {})", self.bindings, self.fact) }
}

/// Describes what [`KnowledgeBase::retract()`] did.
#[derive(Clone, Debug, EnumDebug, Eq, PartialEq)]
pub enum Retraction {
    /// Nothing structurally equal was in the knowledge base.
    NotFound,
    /// The entry is still derivable, so it only stopped being asserted.
    Unasserted,
    /// The entry was never asserted but is still derived, so nothing changed.
    Untouched,
    /// The entry, and everything that only held because of it, was removed. The entries are
    /// given in the order they were removed (dependents before what they depended on).
    Removed(Vec<Entry>),
}





/***** LIBRARY *****/
/// Stores every fact and rule that currently holds, together with why it holds.
///
/// Every time something new is added, it is matched against everything already present, which
/// may derive new facts and (specialized) rules in turn. This continues until nothing new can be
/// derived. Retracting undoes this, removing whatever was only derived from the retracted entry.
///
/// No two facts (or two rules) in the knowledge base are ever structurally equal.
#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    /// The live facts, in order of insertion.
    facts:      IndexMap<FactId, Fact>,
    /// The live rules, in order of insertion.
    rules:      IndexMap<RuleId, Rule>,
    /// Finds facts by their content.
    fact_index: HashMap<Statement, FactId>,
    /// Finds rules by their content.
    rule_index: HashMap<(Vec<Statement>, Statement), RuleId>,
    /// The next fact handle to hand out.
    next_fact:  usize,
    /// The next rule handle to hand out.
    next_rule:  usize,
    /// The engine that derives new entries.
    engine:     InferenceEngine,
    /// How chatty we are.
    config:     Config,
}

// Constructors
impl Default for KnowledgeBase {
    #[inline]
    fn default() -> Self { Self::new() }
}
impl KnowledgeBase {
    /// Constructor for an empty KnowledgeBase with the default [`Config`].
    #[inline]
    pub fn new() -> Self { Self::with_config(Config::default()) }

    /// Constructor for an empty KnowledgeBase.
    ///
    /// # Arguments
    /// - `config`: The [`Config`] that decides what gets traced.
    ///
    /// # Returns
    /// A new KnowledgeBase that knows nothing yet.
    #[inline]
    pub fn with_config(config: Config) -> Self {
        Self {
            facts: IndexMap::new(),
            rules: IndexMap::new(),
            fact_index: HashMap::new(),
            rule_index: HashMap::new(),
            next_fact: 0,
            next_rule: 0,
            engine: InferenceEngine,
            config,
        }
    }

    /// Constructor for a KnowledgeBase that is seeded with some facts and rules.
    ///
    /// Every entry is [asserted](KnowledgeBase::assert()) in order, so everything derivable from
    /// the seed is derived before this returns.
    ///
    /// # Arguments
    /// - `entries`: The facts and/or rules to assert.
    ///
    /// # Returns
    /// A new KnowledgeBase.
    pub fn from_entries(entries: impl IntoIterator<Item = impl Into<Entry>>) -> Self {
        let mut kb = Self::new();
        for entry in entries {
            kb.assert(entry);
        }
        kb
    }
}

// Lookup
impl KnowledgeBase {
    /// The [`Config`] this knowledge base was created with.
    #[inline]
    pub const fn config(&self) -> &Config { &self.config }

    /// Returns the fact with the given handle, if it is still live.
    #[inline]
    pub fn fact(&self, id: FactId) -> Option<&Fact> { self.facts.get(&id) }

    /// Returns the rule with the given handle, if it is still live.
    #[inline]
    pub fn rule(&self, id: RuleId) -> Option<&Rule> { self.rules.get(&id) }

    /// Returns the provenance of the fact or rule with the given handle, if it is still live.
    #[inline]
    pub fn provenance(&self, id: EntryId) -> Option<&Provenance> {
        match id {
            EntryId::Fact(id) => self.facts.get(&id).map(Fact::provenance),
            EntryId::Rule(id) => self.rules.get(&id).map(Rule::provenance),
        }
    }

    /// Mutable counterpart to [`KnowledgeBase::provenance()`].
    #[inline]
    pub(crate) fn provenance_mut(&mut self, id: EntryId) -> Option<&mut Provenance> {
        match id {
            EntryId::Fact(id) => self.facts.get_mut(&id).map(|f| &mut f.prov),
            EntryId::Rule(id) => self.rules.get_mut(&id).map(|r| &mut r.prov),
        }
    }

    /// Finds the live fact with exactly the given statement.
    #[inline]
    pub fn find_fact(&self, statement: &Statement) -> Option<FactId> { self.fact_index.get(statement).copied() }

    /// Finds the live rule with exactly the given antecedents and consequent.
    #[inline]
    pub fn find_rule(&self, lhs: &[Statement], rhs: &Statement) -> Option<RuleId> { self.rule_index.get(&(lhs.to_vec(), rhs.clone())).copied() }

    /// Finds the live entry that is structurally equal to the given one.
    #[inline]
    pub fn find(&self, entry: &Entry) -> Option<EntryId> {
        match entry {
            Entry::Fact(fact) => self.find_fact(&fact.statement).map(EntryId::Fact),
            Entry::Rule(rule) => self.find_rule(&rule.lhs, &rule.rhs).map(EntryId::Rule),
        }
    }

    /// Returns whether an entry structurally equal to the given one is live.
    #[inline]
    pub fn contains(&self, entry: &Entry) -> bool { self.find(entry).is_some() }

    /// Returns an iterator over all live facts, in order of insertion.
    #[inline]
    pub fn facts<'kb>(&'kb self) -> impl 'kb + Clone + ExactSizeIterator + Iterator<Item = (FactId, &'kb Fact)> {
        self.facts.iter().map(|(id, fact)| (*id, fact))
    }

    /// Returns an iterator over all live rules, in order of insertion.
    #[inline]
    pub fn rules<'kb>(&'kb self) -> impl 'kb + Clone + ExactSizeIterator + Iterator<Item = (RuleId, &'kb Rule)> {
        self.rules.iter().map(|(id, rule)| (*id, rule))
    }

    /// Returns whether nothing holds.
    #[inline]
    pub fn is_empty(&self) -> bool { self.facts.is_empty() && self.rules.is_empty() }
}

// Reasoning
impl KnowledgeBase {
    /// Declares a fact or rule to be true.
    ///
    /// If a structurally equal entry already holds, it is marked as asserted. Otherwise, it is
    /// added and everything that follows from it is derived.
    ///
    /// # Arguments
    /// - `entry`: The [`Fact`] or [`Rule`] (or a [`Statement`], as fact) to assert. Whatever
    ///   provenance it carried is ignored.
    ///
    /// # Returns
    /// The handle of the entry as it is stored in the knowledge base.
    pub fn assert(&mut self, entry: impl Into<Entry>) -> EntryId {
        let mut entry: Entry = entry.into();
        *entry.provenance_mut() = Provenance { asserted: true, ..Default::default() };
        debug!("Asserting {entry}");
        self.add(entry)
    }

    /// Adds a fact or rule, merging it into a structurally equal one if that exists.
    ///
    /// Newly added entries are matched against every entry of the other kind.
    ///
    /// # Returns
    /// The handle of the entry as it is stored in the knowledge base.
    #[inline]
    pub(crate) fn add(&mut self, entry: Entry) -> EntryId {
        match entry {
            Entry::Fact(fact) => EntryId::Fact(self.add_fact(fact)),
            Entry::Rule(rule) => EntryId::Rule(self.add_rule(rule)),
        }
    }

    /// Implements [`KnowledgeBase::add()`] for facts.
    fn add_fact(&mut self, fact: Fact) -> FactId {
        if self.config.trace_inference {
            trace!("Adding {fact}");
        }
        if let Some(id) = self.find_fact(&fact.statement) {
            if let Some(existing) = self.facts.get_mut(&id) {
                merge(&mut existing.prov, fact.prov);
            }
            return id;
        }

        // It's new
        let id = FactId(self.next_fact);
        self.next_fact += 1;
        self.fact_index.insert(fact.statement.clone(), id);
        self.facts.insert(id, fact);

        // Match it with all the rules
        let engine: InferenceEngine = self.engine;
        let rules: Vec<RuleId> = self.rules.keys().copied().collect();
        for rule in rules {
            engine.infer(id, rule, self);
        }
        id
    }

    /// Implements [`KnowledgeBase::add()`] for rules.
    fn add_rule(&mut self, rule: Rule) -> RuleId {
        if self.config.trace_inference {
            trace!("Adding {rule}");
        }
        if let Some(id) = self.find_rule(&rule.lhs, &rule.rhs) {
            if let Some(existing) = self.rules.get_mut(&id) {
                merge(&mut existing.prov, rule.prov);
            }
            return id;
        }

        // It's new
        let id = RuleId(self.next_rule);
        self.next_rule += 1;
        self.rule_index.insert((rule.lhs.clone(), rule.rhs.clone()), id);
        self.rules.insert(id, rule);

        // Match it with all the facts
        let engine: InferenceEngine = self.engine;
        let facts: Vec<FactId> = self.facts.keys().copied().collect();
        for fact in facts {
            engine.infer(fact, id, self);
        }
        id
    }

    /// Records that both premises of a derivation support the derived entry.
    pub(crate) fn link(&mut self, support: Support, dependent: EntryId) {
        for premise in [EntryId::Fact(support.fact), EntryId::Rule(support.rule)] {
            if let Some(prov) = self.provenance_mut(premise) {
                prov.add_dependent(dependent);
            }
        }
    }

    /// Asks which facts match a query.
    ///
    /// # Arguments
    /// - `query`: A [`Fact`] (or [`Statement`]) whose statement may contain variables.
    ///
    /// # Returns
    /// One [`Answer`] per matching fact, in order of insertion. Empty if nothing matches, or if
    /// the query is a [`Rule`] (which is logged as a warning).
    pub fn ask(&self, query: impl Into<Entry>) -> Vec<Answer> {
        let query: Fact = match query.into() {
            Entry::Fact(fact) => fact,
            Entry::Rule(rule) => {
                warn!("Invalid ask: {rule} is not a fact");
                return Vec::new();
            },
        };
        debug!("Asking {query}");

        self.facts.iter().filter_map(|(id, fact)| unify(&query.statement, &fact.statement).map(|bindings| Answer { bindings, fact: *id })).collect()
    }

    /// Stops considering a fact or rule to be asserted.
    ///
    /// What happens depends on how the stored entry holds:
    /// - asserted and still derivable: it merely stops being asserted;
    /// - only derived: nothing happens, derived entries disappear with their premises;
    /// - asserted and not derivable: it is removed, together with everything that only held
    ///   because of it.
    ///
    /// # Arguments
    /// - `entry`: The [`Fact`] or [`Rule`] (or a [`Statement`], as fact) to retract.
    ///
    /// # Returns
    /// A [`Retraction`] describing what happened.
    ///
    /// # Errors
    /// This function errors with a [`CycleError`] if the removal cascade finds an entry that
    /// (transitively) supports itself.
    pub fn retract(&mut self, entry: impl Into<Entry>) -> Result<Retraction, CycleError> {
        let entry: Entry = entry.into();
        debug!("Retracting {entry}");

        let Some(id) = self.find(&entry) else {
            debug!("Nothing to retract; {entry} is not in the knowledge base");
            return Ok(Retraction::NotFound);
        };
        let Some(prov) = self.provenance_mut(id) else { return Ok(Retraction::NotFound) };
        match (prov.asserted, prov.supported_by.is_empty()) {
            (true, false) => {
                prov.asserted = false;
                Ok(Retraction::Unasserted)
            },
            (false, false) => Ok(Retraction::Untouched),
            (_, true) => {
                let mut chain: IndexSet<EntryId> = IndexSet::new();
                let mut removed: Vec<Entry> = Vec::new();
                self.remove(id, &mut chain, &mut removed)?;
                Ok(Retraction::Removed(removed))
            },
        }
    }

    /// Removes an entry that has lost its last reason to exist, and everything that only held
    /// because of it.
    ///
    /// # Arguments
    /// - `id`: The entry to remove. Must not be in `chain`.
    /// - `chain`: The removals that are currently in progress.
    /// - `removed`: Collects the removed entries.
    ///
    /// # Errors
    /// This function errors if a dependent of `id` is already in `chain`.
    fn remove(&mut self, id: EntryId, chain: &mut IndexSet<EntryId>, removed: &mut Vec<Entry>) -> Result<(), CycleError> {
        if self.config.trace_retraction {
            trace!("Removing {id} (chain depth {})", chain.len());
        }
        chain.insert(id);

        let dependents: Vec<EntryId> = match self.provenance(id) {
            Some(prov) => prov.dependents().collect(),
            None => {
                chain.pop();
                return Ok(());
            },
        };
        for dep in dependents {
            if chain.contains(&dep) {
                return Err(CycleError { entry: dep, chain: chain.iter().copied().collect() });
            }

            // Forget every derivation of the dependent that used us
            let Some(prov) = self.provenance_mut(dep) else { continue };
            let stripped: Vec<Support> = prov.strip_supports(id);
            let orphaned: bool = !prov.is_live();
            for support in stripped {
                if let Some(other) = support.other(id) {
                    self.unlink(other, dep);
                }
            }

            if orphaned {
                if self.config.trace_retraction {
                    trace!("{dep} lost its last support through {id}");
                }
                self.remove(dep, chain, removed)?;
            }
        }

        // Now drop the slot itself
        let entry: Option<Entry> = match id {
            EntryId::Fact(fid) => self.facts.shift_remove(&fid).map(|fact| {
                self.fact_index.remove(&fact.statement);
                Entry::Fact(fact)
            }),
            EntryId::Rule(rid) => self.rules.shift_remove(&rid).map(|rule| {
                self.rule_index.remove(&(rule.lhs.clone(), rule.rhs.clone()));
                Entry::Rule(rule)
            }),
        };
        if let Some(entry) = entry {
            for support in entry.provenance().supported_by() {
                for premise in [EntryId::Fact(support.fact), EntryId::Rule(support.rule)] {
                    if let Some(prov) = self.provenance_mut(premise) {
                        prov.remove_dependent(id);
                    }
                }
            }
            removed.push(entry);
        }
        chain.pop();
        Ok(())
    }

    /// Drops `dependent` from the back-links of `supporter`, unless it is still derived from it
    /// in some other way.
    fn unlink(&mut self, supporter: EntryId, dependent: EntryId) {
        let still_supported: bool = self.provenance(dependent).map(|prov| prov.supported_by.iter().any(|s| s.mentions(supporter))).unwrap_or(false);
        if !still_supported {
            if let Some(prov) = self.provenance_mut(supporter) {
                prov.remove_dependent(dependent);
            }
        }
    }
}

// Auditing
impl KnowledgeBase {
    /// Checks that the knowledge base upholds its invariants.
    ///
    /// Specifically, that every entry is live and uniquely indexed, that every derivation refers
    /// to live premises that know about it, and that every back-link is matched by a derivation.
    ///
    /// # Errors
    /// This function errors with the first [`InconsistencyError`] it finds.
    pub fn validate(&self) -> Result<(), InconsistencyError> {
        // Stale index entries
        if let Some(id) = self.fact_index.values().find(|id| !self.facts.contains_key(*id)) {
            return Err(InconsistencyError::Unindexed { entry: EntryId::Fact(*id) });
        }
        if let Some(id) = self.rule_index.values().find(|id| !self.rules.contains_key(*id)) {
            return Err(InconsistencyError::Unindexed { entry: EntryId::Rule(*id) });
        }

        let entries = self
            .facts
            .iter()
            .map(|(id, fact)| (EntryId::Fact(*id), &fact.prov))
            .chain(self.rules.iter().map(|(id, rule)| (EntryId::Rule(*id), &rule.prov)));
        for (id, prov) in entries {
            if self.find(&self.entry_shape(id)?) != Some(id) {
                return Err(InconsistencyError::Unindexed { entry: id });
            }
            if !prov.is_live() {
                return Err(InconsistencyError::NotLive { entry: id });
            }
            for support in &prov.supported_by {
                for premise in [EntryId::Fact(support.fact), EntryId::Rule(support.rule)] {
                    match self.provenance(premise) {
                        Some(pprov) if pprov.dependents().any(|d| d == id) => {},
                        Some(_) => return Err(InconsistencyError::MissingBacklink { entry: id, premise }),
                        None => return Err(InconsistencyError::DanglingSupport { entry: id, support: *support }),
                    }
                }
            }
            for dependent in prov.dependents() {
                match self.provenance(dependent) {
                    Some(dprov) if dprov.supported_by.iter().any(|s| s.mentions(id)) => {},
                    _ => return Err(InconsistencyError::StaleBacklink { entry: id, dependent }),
                }
            }
        }
        Ok(())
    }

    /// Returns a provenance-less copy of the content of a live entry, for lookups.
    fn entry_shape(&self, id: EntryId) -> Result<Entry, InconsistencyError> {
        match id {
            EntryId::Fact(fid) => self.fact(fid).map(|f| Entry::Fact(Fact::new(f.statement.clone()))),
            EntryId::Rule(rid) => self.rule(rid).map(|r| Entry::Rule(Rule::new(r.lhs.clone(), r.rhs.clone()))),
        }
        .ok_or(InconsistencyError::Unindexed { entry: id })
    }
}

// Collection
impl KnowledgeBase {
    /// Forgets everything, but keeps the [`Config`] and the memory around.
    ///
    /// Handles are not re-used after a reset either.
    #[inline]
    pub fn reset(&mut self) {
        self.facts.clear();
        self.rules.clear();
        self.fact_index.clear();
        self.rule_index.clear();
    }
}

// Formatting
impl Display for KnowledgeBase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        writeln!(f, "Knowledge base {{")?;
        write!(f, "    facts:")?;
        if self.facts.is_empty() {
            writeln!(f, " <none>")?;
        } else {
            writeln!(f)?;
            for (id, fact) in &self.facts {
                write!(f, "      {} {id}: {}", marker(&fact.prov), fact.statement)?;
                if !fact.prov.supported_by.is_empty() {
                    write!(f, " <- {}", fact.prov.supported_by.iter().format(", "))?;
                }
                writeln!(f)?;
            }
        }
        write!(f, "    rules:")?;
        if self.rules.is_empty() {
            writeln!(f, " <none>")?;
        } else {
            writeln!(f)?;
            for (id, rule) in &self.rules {
                write!(f, "      {} {id}: ({}) -> {}", marker(&rule.prov), rule.lhs.iter().format(" "), rule.rhs)?;
                if !rule.prov.supported_by.is_empty() {
                    write!(f, " <- {}", rule.prov.supported_by.iter().format(", "))?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "}}")
    }
}





/***** TESTS *****/
