//! Nullable and FIRST computation for context-free grammars.
//!
//! This module implements the ε-derivability predicate and the FIRST set
//! over arbitrary symbol sequences, per Aho et al., "Compilers: Principles,
//! Techniques, and Tools" (2nd Edition), section 4.4, generalized to
//! sequences rather than single symbols, and without FOLLOW (see
//! DESIGN.md for why FOLLOW was dropped from this crate).

use crate::error::{GrammarError, Result};
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::HashSet;
use std::collections::HashMap;

/// Memoized nullable/FIRST engine bound to a single grammar.
///
/// Built eagerly: the constructor runs the fixed-point passes once and
/// every later query is a map lookup. A symbol under active computation
/// during the fixed point never contributes truth to itself mid-pass;
/// each pass only ever reads the *previous* pass's values before writing
/// the next, so self-reference during a pass simply sees "not yet known"
/// rather than a premature `true`.
pub struct NullableFirst<'g> {
    grammar: &'g Grammar,
    nullable: HashMap<Symbol, bool>,
    first: HashMap<Symbol, HashSet<Symbol>>,
}

impl<'g> NullableFirst<'g> {
    /// Builds the engine, running fixed-point iteration over `grammar`.
    pub fn new(grammar: &'g Grammar) -> Self {
        let mut nullable: HashMap<Symbol, bool> = HashMap::new();
        let mut first: HashMap<Symbol, HashSet<Symbol>> = HashMap::new();

        for t in grammar.terminals() {
            nullable.insert(t.clone(), false);
            first.insert(t.clone(), HashSet::from([t.clone()]));
        }
        for nt in grammar.nonterminals() {
            nullable.insert(nt.clone(), false);
            first.insert(nt.clone(), HashSet::new());
        }

        let mut changed = true;
        while changed {
            changed = false;

            for (_, prod) in grammar.all_productions() {
                let head = &prod.head;

                let body_nullable = prod.body.iter().all(|s| nullable[s]);
                if body_nullable && !nullable[head] {
                    nullable.insert(head.clone(), true);
                    changed = true;
                }

                let mut addition = HashSet::new();
                for sym in &prod.body {
                    addition.extend(first[sym].iter().cloned());
                    if !nullable[sym] {
                        break;
                    }
                }
                if !addition.is_subset(&first[head]) {
                    first
                        .get_mut(head)
                        .expect("every non-terminal was seeded above")
                        .extend(addition);
                    changed = true;
                }
            }
        }

        Self {
            grammar,
            nullable,
            first,
        }
    }

    fn check_known(&self, sym: &Symbol) -> Result<()> {
        if self.grammar.contains_symbol(sym) {
            Ok(())
        } else {
            Err(GrammarError::UnknownSymbol(sym.name().to_string()))
        }
    }

    /// `nullable(sym)` for a single symbol already in the grammar.
    pub fn nullable(&self, sym: &Symbol) -> Result<bool> {
        self.check_known(sym)?;
        Ok(self.nullable[sym])
    }

    /// `first(sym)` for a single symbol already in the grammar.
    pub fn first(&self, sym: &Symbol) -> Result<HashSet<Symbol>> {
        self.check_known(sym)?;
        Ok(self.first[sym].clone())
    }

    /// `derives_epsilon(seq)`: true iff every symbol in `seq` is nullable.
    /// The empty sequence trivially derives epsilon.
    pub fn derives_epsilon(&self, seq: &[Symbol]) -> Result<bool> {
        for sym in seq {
            if !self.nullable(sym)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `first(seq)`: FIRST of a symbol sequence, per §4.1's prefix rule.
    /// The empty sequence has an empty FIRST set.
    pub fn first_of(&self, seq: &[Symbol]) -> Result<HashSet<Symbol>> {
        let mut result = HashSet::new();
        for sym in seq {
            result.extend(self.first(sym)?);
            if !self.nullable(sym)? {
                break;
            }
        }
        Ok(result)
    }
}
