//! Symbol types for context-free grammars.
//!
//! This module defines the core Symbol type used throughout the grammar,
//! item-set, table, and driver layers: a terminal or non-terminal identified
//! by an interned textual name.

use std::fmt;
use std::rc::Rc;

/// The reserved name of the end-of-input terminal.
pub const END_NAME: &str = "$end";

/// Represents a symbol in a context-free grammar.
///
/// Terminals and non-terminals are distinguished by variant, not by any
/// convention on the spelling of their name; a grammar may name a
/// non-terminal `expr` and a terminal `ID` side by side. Equality and
/// hashing are derived from `(variant, name)`, so two `Symbol` values
/// constructed from the same name are interchangeable regardless of which
/// call site produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// A terminal symbol, named by the token spelling the loader used.
    Terminal(Rc<str>),
    /// A non-terminal symbol, named by its head spelling in the grammar source.
    Nonterminal(Rc<str>),
}

impl Symbol {
    /// Creates a new terminal with the given name.
    pub fn terminal(name: impl Into<Rc<str>>) -> Self {
        Symbol::Terminal(name.into())
    }

    /// Creates a new non-terminal with the given name.
    pub fn nonterminal(name: impl Into<Rc<str>>) -> Self {
        Symbol::Nonterminal(name.into())
    }

    /// Creates the distinguished end-of-input terminal.
    pub fn end() -> Self {
        Symbol::Terminal(Rc::from(END_NAME))
    }

    /// Checks if this symbol is a terminal.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Checks if this symbol is a non-terminal.
    #[inline]
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }

    /// Checks if this symbol is the reserved end-of-input terminal.
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, Symbol::Terminal(name) if &**name == END_NAME)
    }

    /// Returns the textual name of this symbol.
    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::Nonterminal(name) => name,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_and_nonterminal_with_same_name_are_distinct() {
        let t = Symbol::terminal("a");
        let n = Symbol::nonterminal("a");
        assert_ne!(t, n);
        assert_eq!(t.name(), n.name());
    }

    #[test]
    fn end_is_a_terminal() {
        let end = Symbol::end();
        assert!(end.is_terminal());
        assert!(end.is_end());
        assert!(!Symbol::terminal("a").is_end());
    }

    #[test]
    fn equality_is_by_name_and_kind() {
        assert_eq!(Symbol::terminal("x"), Symbol::terminal("x"));
        assert_ne!(Symbol::terminal("x"), Symbol::terminal("y"));
    }
}
