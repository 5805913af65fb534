//! The table-driven shift/reduce/accept parse driver.
//!
//! Mirrors `LRParser.py`'s stack machine, but trades its exception-based
//! `ParseFinish` control-flow signal for an idiomatic `Result<(), ParseError>`:
//! `Ok(())` *is* acceptance, `Err` is either a stuck parse or a malformed
//! table.

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use crate::table::{Action, Tables};

/// Drives a parse of a terminal stream against a set of ACTION/GOTO tables.
///
/// Holds no mutable state itself; each call to [`Parser::parse`] starts a
/// fresh stack, so one `Parser` can parse any number of independent inputs.
pub struct Parser<'t> {
    tables: &'t Tables,
    grammar: &'t Grammar,
}

impl<'t> Parser<'t> {
    pub fn new(tables: &'t Tables, grammar: &'t Grammar) -> Self {
        Self { tables, grammar }
    }

    /// Runs the shift/reduce/accept loop over `input`, a sequence of
    /// terminal symbols with the end marker implied (callers do not append
    /// [`Symbol::end`] themselves; the driver reads past the end of
    /// `input` as the end marker).
    ///
    /// `Ok(())` means the input was accepted. `Err` reports the first state
    /// at which no action applies, or a goto failure after a reduce (which
    /// only happens if the tables themselves are malformed).
    pub fn parse(&self, input: &[Symbol]) -> Result<(), ParseError> {
        let mut stack: Vec<usize> = vec![self.tables.start];
        let mut pos = 0usize;

        loop {
            let state = *stack.last().expect("stack is never empty");
            let lookahead = input.get(pos).cloned().unwrap_or_else(|| self.grammar.end().clone());

            match self.tables.action(state, &lookahead) {
                Some(Action::Shift(next)) => {
                    stack.push(*next);
                    pos += 1;
                }
                Some(Action::Reduce(prod_id)) => {
                    let prod = self.grammar.production(*prod_id);
                    for _ in 0..prod.body.len() {
                        stack.pop();
                    }
                    let top = *stack.last().expect("stack is never empty");
                    let goto_state = self
                        .tables
                        .goto(top, &prod.head)
                        .ok_or_else(|| ParseError::NoGoto {
                            state: top,
                            symbol: prod.head.to_string(),
                        })?;
                    stack.push(goto_state);
                }
                Some(Action::Accept) => return Ok(()),
                None => {
                    return Err(ParseError::NoAction {
                        state,
                        symbol: lookahead.to_string(),
                        position: pos,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;
    use crate::table;

    fn body(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn terms(s: &str) -> Vec<Symbol> {
        s.split_whitespace().map(Symbol::terminal).collect()
    }

    #[test]
    fn accepts_balanced_parentheses() {
        // S : ( S ) | ( ) ;
        let mut b = GrammarBuilder::new();
        b.production("S", body("( S )")).production("S", body("( )"));
        let g = b.build().unwrap().augment();
        let tables = table::build_lr1(&g).unwrap();
        let parser = Parser::new(&tables, &g);

        assert!(parser.parse(&terms("( ( ) )")).is_ok());
        assert!(parser.parse(&terms("( )")).is_ok());
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        let mut b = GrammarBuilder::new();
        b.production("S", body("( S )")).production("S", body("( )"));
        let g = b.build().unwrap().augment();
        let tables = table::build_lr1(&g).unwrap();
        let parser = Parser::new(&tables, &g);

        let err = parser.parse(&terms("( (  )")).unwrap_err();
        assert!(matches!(err, ParseError::NoAction { .. }));
    }

    #[test]
    fn accepts_arithmetic_expression_with_precedence_via_grammar_shape() {
        // E : E + T | T ;  T : T * F | F ;  F : ( E ) | id ;
        let mut b = GrammarBuilder::new();
        b.production("E", body("E + T"))
            .production("E", body("T"))
            .production("T", body("T * F"))
            .production("T", body("F"))
            .production("F", body("( E )"))
            .production("F", body("id"));
        let g = b.build().unwrap().augment();
        let tables = table::build_lr1(&g).unwrap();
        let parser = Parser::new(&tables, &g);

        assert!(parser.parse(&terms("id + id * id")).is_ok());
        assert!(parser.parse(&terms("( id + id ) * id")).is_ok());
        assert!(parser.parse(&terms("id +")).is_err());
    }

    #[test]
    fn accepts_nullable_list_grammar() {
        // S : A ; A : a A | ;
        let mut b = GrammarBuilder::new();
        b.production("S", body("A"))
            .production("A", body("a A"))
            .production("A", vec![]);
        let g = b.build().unwrap().augment();
        let tables = table::build_lr1(&g).unwrap();
        let parser = Parser::new(&tables, &g);

        assert!(parser.parse(&terms("")).is_ok());
        assert!(parser.parse(&terms("a a a")).is_ok());
    }
}
