//! ACTION/GOTO table construction for LR(0) and LR(1) canonical collections.
//!
//! Both constructors share the same skeleton: seed state 0 from the
//! augmented start item, explore the canonical collection with a worklist,
//! and populate ACTION (shift/reduce/accept) and GOTO from each state, and
//! differ only in how items carry (or don't carry) a lookahead set, and in
//! which terminals a reduce gets written under. This mirrors `LR0.py` and
//! `LR1.py`'s `Parser.construct`.

use crate::error::{ConflictError, TableError};
use crate::grammar::{Grammar, ProdId};
use crate::lr0;
use crate::lr1;
use crate::nullable_first::NullableFirst;
use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

/// An ACTION table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(ProdId),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "shift to state {state}"),
            Action::Reduce(prod) => write!(f, "reduce by production {prod}"),
            Action::Accept => write!(f, "accept"),
        }
    }
}

/// The ACTION and GOTO tables produced by canonical LR table construction,
/// plus the id of the start state.
#[derive(Debug, Clone)]
pub struct Tables {
    pub start: usize,
    pub state_count: usize,
    action: HashMap<(usize, Symbol), Action>,
    goto: HashMap<(usize, Symbol), usize>,
}

impl Tables {
    fn new(start: usize) -> Self {
        Self {
            start,
            state_count: 0,
            action: HashMap::new(),
            goto: HashMap::new(),
        }
    }

    /// The ACTION table entry for `(state, symbol)`, if any.
    pub fn action(&self, state: usize, symbol: &Symbol) -> Option<&Action> {
        self.action.get(&(state, symbol.clone()))
    }

    /// The GOTO table entry for `(state, non_terminal)`, if any.
    pub fn goto(&self, state: usize, non_terminal: &Symbol) -> Option<usize> {
        self.goto.get(&(state, non_terminal.clone())).copied()
    }

    fn set_action(&mut self, state: usize, symbol: &Symbol, action: Action) -> Result<(), ConflictError> {
        let key = (state, symbol.clone());
        if let Some(existing) = self.action.get(&key) {
            if *existing != action {
                return Err(ConflictError {
                    state,
                    symbol: symbol.to_string(),
                    existing: existing.to_string(),
                    new: action.to_string(),
                });
            }
            return Ok(());
        }
        self.action.insert(key, action);
        Ok(())
    }

    fn set_goto(&mut self, state: usize, symbol: &Symbol, target: usize) -> Result<(), ConflictError> {
        let key = (state, symbol.clone());
        if let Some(&existing) = self.goto.get(&key) {
            if existing != target {
                return Err(ConflictError {
                    state,
                    symbol: symbol.to_string(),
                    existing: existing.to_string(),
                    new: target.to_string(),
                });
            }
            return Ok(());
        }
        self.goto.insert(key, target);
        Ok(())
    }
}

/// Builds the canonical LR(0) ACTION/GOTO tables for `grammar`, which must
/// already be augmented.
///
/// Reduce items populate every terminal in the grammar, including END (the
/// pure LR(0) convention: no lookahead refinement is available at this level).
pub fn build_lr0(grammar: &Grammar) -> Result<Tables, TableError> {
    let start_prod = grammar.start_prod()?;
    let ops = lr0::Operations::new(grammar);
    let i0 = ops.closure([lr0::Item::new(start_prod, 0)]);

    let mut states: Vec<lr0::ItemSet> = vec![i0.clone()];
    let mut index: HashMap<lr0::ItemSet, usize> = HashMap::from([(i0, 0)]);
    let mut queue: VecDeque<usize> = VecDeque::from([0]);
    let mut tables = Tables::new(0);

    while let Some(state_id) = queue.pop_front() {
        let state = states[state_id].clone();
        let mut shifted: HashSet<Symbol> = HashSet::new();

        for item in state.iter() {
            match item.expected(grammar) {
                Some(sym) => {
                    if !shifted.insert(sym.clone()) {
                        continue;
                    }
                    let next = ops.goto(&state, &sym);
                    if next.is_empty() {
                        continue;
                    }
                    let next_id = intern_state(&mut states, &mut index, &mut queue, next);
                    if sym.is_nonterminal() {
                        tables.set_goto(state_id, &sym, next_id)?;
                    } else {
                        tables.set_action(state_id, &sym, Action::Shift(next_id))?;
                    }
                }
                None if item.prod == start_prod => {
                    tables.set_action(state_id, grammar.end(), Action::Accept)?;
                }
                None => {
                    for t in grammar.terminals().iter().chain(std::iter::once(grammar.end())) {
                        tables.set_action(state_id, t, Action::Reduce(item.prod))?;
                    }
                }
            }
        }
    }

    tables.state_count = states.len();
    Ok(tables)
}

/// Builds the canonical LR(1) ACTION/GOTO tables for `grammar`, which must
/// already be augmented.
///
/// Reduce items populate only their own lookahead set, which is what gives
/// LR(1) its extra resolving power over LR(0)/SLR(1).
pub fn build_lr1(grammar: &Grammar) -> Result<Tables, TableError> {
    let start_prod = grammar.start_prod()?;
    let nf = NullableFirst::new(grammar);
    let ops = lr1::Operations::new(grammar, &nf);
    let seed = lr1::Item::new(start_prod, 0, BTreeSet::from([grammar.end().clone()]));
    let i0 = ops.closure([seed]);

    let mut states: Vec<lr1::ItemSet> = vec![i0.clone()];
    let mut index: HashMap<lr1::ItemSet, usize> = HashMap::from([(i0, 0)]);
    let mut queue: VecDeque<usize> = VecDeque::from([0]);
    let mut tables = Tables::new(0);

    while let Some(state_id) = queue.pop_front() {
        let state = states[state_id].clone();
        let mut shifted: HashSet<Symbol> = HashSet::new();

        for item in state.iter() {
            match item.expected(grammar) {
                Some(sym) => {
                    if !shifted.insert(sym.clone()) {
                        continue;
                    }
                    let next = ops.goto(&state, &sym);
                    if next.is_empty() {
                        continue;
                    }
                    let next_id = intern_state(&mut states, &mut index, &mut queue, next);
                    if sym.is_nonterminal() {
                        tables.set_goto(state_id, &sym, next_id)?;
                    } else {
                        tables.set_action(state_id, &sym, Action::Shift(next_id))?;
                    }
                }
                None if item.prod == start_prod => {
                    tables.set_action(state_id, grammar.end(), Action::Accept)?;
                }
                None => {
                    for t in &item.lookahead {
                        tables.set_action(state_id, t, Action::Reduce(item.prod))?;
                    }
                }
            }
        }
    }

    tables.state_count = states.len();
    Ok(tables)
}

fn intern_state<S: Clone + std::hash::Hash + Eq>(
    states: &mut Vec<S>,
    index: &mut HashMap<S, usize>,
    queue: &mut VecDeque<usize>,
    state: S,
) -> usize {
    if let Some(&id) = index.get(&state) {
        return id;
    }
    let id = states.len();
    states.push(state.clone());
    index.insert(state, id);
    queue.push_back(id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    fn body(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn lr0_builds_tables_for_unambiguous_grammar() {
        // S : ( S ) | ( ) ;
        let mut b = GrammarBuilder::new();
        b.production("S", body("( S )")).production("S", body("( )"));
        let g = b.build().unwrap().augment();

        let tables = build_lr0(&g).unwrap();
        assert!(tables.state_count > 0);
        assert!(matches!(
            tables.action(0, &Symbol::terminal("(")),
            Some(Action::Shift(_))
        ));
    }

    #[test]
    fn lr0_detects_shift_reduce_conflict() {
        // Classic dangling-else-shaped ambiguity collapsed to terminals:
        // S : A | A a ; A : a ;
        // At the state after shifting `a` as A's body, LR(0) must choose
        // between reducing A -> a (lookahead any terminal) and shifting the
        // second `a` of `A a`; both complete and incomplete items coexist
        // with `a` active, which conflicts under the "every terminal"
        // reduce convention.
        let mut b = GrammarBuilder::new();
        b.production("S", body("A")).production("S", body("A a")).production("A", body("a"));
        let g = b.build().unwrap().augment();

        let result = build_lr0(&g);
        assert!(result.is_err());
    }

    #[test]
    fn lr1_resolves_what_lr0_cannot() {
        // S : A a | B b ; A : c ; B : c ;
        // LR(0) alone cannot tell `A -> c` from `B -> c` reduces apart; the
        // lookahead (a vs b from the tail) disambiguates under LR(1).
        let mut b = GrammarBuilder::new();
        b.production("S", body("A a"))
            .production("S", body("B b"))
            .production("A", body("c"))
            .production("B", body("c"));
        let g = b.build().unwrap().augment();

        let lr1_tables = build_lr1(&g);
        assert!(lr1_tables.is_ok());
    }

    #[test]
    fn accept_action_is_on_end_symbol() {
        let mut b = GrammarBuilder::new();
        b.production("S", body("a"));
        let g = b.build().unwrap().augment();
        let tables = build_lr1(&g).unwrap();

        let s_state = tables
            .goto(0, &Symbol::nonterminal("S"))
            .expect("goto on S from state 0");
        assert_eq!(tables.action(s_state, g.end()), Some(&Action::Accept));
    }
}
