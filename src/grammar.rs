//! Grammar module for context-free grammars.
//!
//! This module provides the core data model: productions held in a flat
//! arena and referenced by index, non-terminals recording only the index
//! range (well, index list, since productions of one non-terminal need not be
//! contiguous once a builder appends out of order) of their own productions,
//! and a `Grammar` container that is immutable once built. The grammar file
//! surface syntax lives in [`crate::loader`]; this module never touches text.

use crate::error::{GrammarError, Result};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Index of a [`Production`] in a [`Grammar`]'s arena.
///
/// Items reference productions by this id rather than by clone, which is
/// what makes an LR item trivially hashable and cheap to copy.
pub type ProdId = usize;

/// A production rule in a context-free grammar: `head → body`.
///
/// `body` is empty for an ε-production; there is no separate epsilon
/// symbol; epsilon is simply the absence of any body symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub head: Symbol,
    pub body: Vec<Symbol>,
}

impl Production {
    pub fn new(head: Symbol, body: Vec<Symbol>) -> Self {
        Self { head, body }
    }

    /// Returns the symbol at `pos`, if `pos` is within the body.
    pub fn symbol_at(&self, pos: usize) -> Option<&Symbol> {
        self.body.get(pos)
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{} → ε", self.head)
        } else {
            let body: Vec<_> = self.body.iter().map(|s| s.to_string()).collect();
            write!(f, "{} → {}", self.head, body.join(" "))
        }
    }
}

/// A context-free grammar: a read-only container of productions and symbols.
///
/// Built once via [`GrammarBuilder`], then (usually) augmented once via
/// [`Grammar::augment`]. Every symbol appearing in any production body is
/// guaranteed to be interned in either `terminals` or `nonterminals`.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    nonterminal_prods: HashMap<Symbol, Vec<ProdId>>,
    terminals: HashSet<Symbol>,
    start: Symbol,
    end: Symbol,
    start_prod: Option<ProdId>,
}

impl Grammar {
    /// Returns the production stored at `id`.
    pub fn production(&self, id: ProdId) -> &Production {
        &self.productions[id]
    }

    /// Returns every production in the grammar, paired with its id.
    pub fn all_productions(&self) -> impl Iterator<Item = (ProdId, &Production)> {
        self.productions.iter().enumerate()
    }

    /// Returns the ids of the productions owned by a non-terminal, in
    /// source order. Empty if `nt` is not a non-terminal of this grammar.
    pub fn productions_of(&self, nt: &Symbol) -> &[ProdId] {
        self.nonterminal_prods
            .get(nt)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the set of non-terminals in the grammar.
    pub fn nonterminals(&self) -> impl Iterator<Item = &Symbol> {
        self.nonterminal_prods.keys()
    }

    /// Returns the set of terminals appearing in some production body.
    /// END is never among them (it never appears in a body); callers that
    /// need "every terminal including END" should chain in [`Grammar::end`].
    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// Returns the designated start non-terminal.
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// Returns the distinguished end-of-input terminal.
    pub fn end(&self) -> &Symbol {
        &self.end
    }

    /// Returns the id of `START.productions[0]`, if this grammar has been
    /// augmented.
    pub fn start_prod(&self) -> Result<ProdId> {
        self.start_prod
            .ok_or_else(|| GrammarError::NotAugmented(self.start.name().to_string()))
    }

    /// Wraps this grammar with a fresh start non-terminal `S'` whose sole
    /// production is `S' → S`, where `S` is the current start symbol.
    ///
    /// Idempotent in spirit but not in practice: calling it twice produces
    /// two layers of wrapping, each a legal (if pointless) augmentation.
    pub fn augment(mut self) -> Self {
        let fresh_name = format!("{}'", self.start.name());
        let augmented_start = Symbol::nonterminal(fresh_name);
        let start_prod = Production::new(augmented_start.clone(), vec![self.start.clone()]);

        let id = self.productions.len();
        self.productions.push(start_prod);
        self.nonterminal_prods
            .insert(augmented_start.clone(), vec![id]);

        self.start = augmented_start;
        self.start_prod = Some(id);
        self
    }

    /// True once [`Grammar::augment`] has been applied.
    pub fn is_augmented(&self) -> bool {
        self.start_prod.is_some()
    }

    /// True if `sym` is interned as either a terminal or non-terminal of
    /// this grammar.
    pub fn contains_symbol(&self, sym: &Symbol) -> bool {
        self.terminals.contains(sym) || self.nonterminal_prods.contains_key(sym)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{}", prod)?;
        }
        Ok(())
    }
}

/// Assembles a [`Grammar`] from productions supplied in source order.
///
/// Mirrors the way the loader (and any other caller) discovers symbols:
/// a non-terminal is any symbol that appears as the head of at least one
/// production; everything else referenced from a body is a terminal.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    start_name: Option<String>,
    heads: Vec<String>,
    bodies: Vec<Vec<String>>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a production `head -> body`. The first production added
    /// determines the start symbol unless overridden by [`Self::start`].
    pub fn production(&mut self, head: impl Into<String>, body: Vec<String>) -> &mut Self {
        self.heads.push(head.into());
        self.bodies.push(body);
        self
    }

    /// Overrides the start symbol (defaults to the head of the first
    /// production added).
    pub fn start(&mut self, name: impl Into<String>) -> &mut Self {
        self.start_name = Some(name.into());
        self
    }

    /// Builds the grammar, interning every symbol name exactly once.
    pub fn build(&self) -> Result<Grammar> {
        if self.heads.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let head_names: HashSet<&str> = self.heads.iter().map(String::as_str).collect();

        if head_names.contains(crate::symbol::END_NAME) {
            return Err(GrammarError::ReservedEndToken(
                crate::symbol::END_NAME.to_string(),
            ));
        }
        for body in &self.bodies {
            if body.iter().any(|s| s == crate::symbol::END_NAME) {
                return Err(GrammarError::ReservedEndToken(
                    crate::symbol::END_NAME.to_string(),
                ));
            }
        }

        let mut interned: HashMap<String, Symbol> = HashMap::new();
        let mut intern = |name: &str| -> Symbol {
            if let Some(sym) = interned.get(name) {
                return sym.clone();
            }
            let sym = if head_names.contains(name) {
                Symbol::nonterminal(name)
            } else {
                Symbol::terminal(name)
            };
            interned.insert(name.to_string(), sym.clone());
            sym
        };

        let mut productions = Vec::with_capacity(self.heads.len());
        let mut nonterminal_prods: HashMap<Symbol, Vec<ProdId>> = HashMap::new();

        for (head_name, body_names) in self.heads.iter().zip(&self.bodies) {
            let head = intern(head_name);
            let body = body_names.iter().map(|s| intern(s)).collect();
            let id = productions.len();
            productions.push(Production::new(head.clone(), body));
            nonterminal_prods.entry(head).or_default().push(id);
        }

        for head in &self.heads {
            let sym = interned
                .get(head.as_str())
                .expect("every head was interned by the loop above");
            nonterminal_prods.entry(sym.clone()).or_default();
        }

        let terminals: HashSet<Symbol> = interned
            .values()
            .filter(|s| s.is_terminal())
            .cloned()
            .collect();

        let start_name = self
            .start_name
            .clone()
            .unwrap_or_else(|| self.heads[0].clone());
        let start = interned
            .get(start_name.as_str())
            .cloned()
            .ok_or(GrammarError::UnknownSymbol(start_name))?;

        if !nonterminal_prods
            .get(&start)
            .map(|v| !v.is_empty())
            .unwrap_or(false)
        {
            return Err(GrammarError::NoProductions(start.name().to_string()));
        }

        Ok(Grammar {
            productions,
            nonterminal_prods,
            terminals,
            start,
            end: Symbol::end(),
            start_prod: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn builds_simple_grammar() {
        let mut b = GrammarBuilder::new();
        b.production("S", body("A B")).production("A", body("a"));

        let g = b.build().unwrap();
        assert_eq!(g.all_productions().count(), 2);
        assert!(g.nonterminals().any(|s| s.name() == "S"));
        assert!(g.terminals().contains(&Symbol::terminal("a")));
    }

    #[test]
    fn epsilon_production_has_empty_body() {
        let mut b = GrammarBuilder::new();
        b.production("S", vec![]);
        let g = b.build().unwrap();
        let prods = g.productions_of(g.start());
        assert_eq!(g.production(prods[0]).body, Vec::<Symbol>::new());
    }

    #[test]
    fn empty_grammar_is_rejected() {
        let b = GrammarBuilder::new();
        assert!(matches!(b.build(), Err(GrammarError::EmptyGrammar)));
    }

    #[test]
    fn reserved_end_token_is_rejected() {
        let mut b = GrammarBuilder::new();
        b.production("S", body("a $end"));
        assert!(matches!(
            b.build(),
            Err(GrammarError::ReservedEndToken(_))
        ));
    }

    #[test]
    fn augment_wraps_start_in_fresh_production() {
        let mut b = GrammarBuilder::new();
        b.production("S", body("a"));
        let g = b.build().unwrap().augment();

        assert!(g.is_augmented());
        let start_prod = g.production(g.start_prod().unwrap());
        assert_eq!(start_prod.head, *g.start());
        assert_eq!(start_prod.body, vec![Symbol::nonterminal("S")]);
    }

    #[test]
    fn multiple_alternatives_share_head_in_order() {
        let mut b = GrammarBuilder::new();
        b.production("S", body("a"))
            .production("S", body("b"))
            .production("S", vec![]);
        let g = b.build().unwrap();
        let prods = g.productions_of(g.start());
        assert_eq!(prods.len(), 3);
        assert_eq!(g.production(prods[0]).body, vec![Symbol::terminal("a")]);
        assert_eq!(g.production(prods[1]).body, vec![Symbol::terminal("b")]);
        assert!(g.production(prods[2]).body.is_empty());
    }
}
