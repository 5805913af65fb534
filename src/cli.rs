//! Command-line driver: load a grammar file and an input file, build the
//! requested canonical table, and report a per-line accept/reject verdict.
//!
//! The core never sees a path or a line of text; this module is the only
//! place that touches stdio, turning [`crate::loader`] and [`crate::table`]
//! output into the pass/fail report and exit code described by the grammar
//! file surface syntax.

use crate::error::TableError;
use crate::grammar::Grammar;
use crate::loader;
use crate::parser::Parser;
use crate::symbol::Symbol;
use crate::table::{self, Tables};
use clap::Parser as ClapParser;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Canonical LR(0)/LR(1) parser-table generator and driver.
#[derive(ClapParser, Debug)]
#[command(name = "cfg_parser", version, about)]
pub struct Cli {
    /// Path to a grammar file using the `HEAD : body1 | body2 ;` surface syntax.
    pub grammar: PathBuf,

    /// Path to an input file, parsed one line at a time.
    pub input: PathBuf,

    /// Build the weaker canonical LR(0) table instead of LR(1).
    #[arg(long)]
    pub lr0: bool,

    /// Override the grammar's start symbol (defaults to the first block's head).
    #[arg(long)]
    pub start: Option<String>,
}

/// Parses command-line arguments and runs the driver, returning a process
/// exit code: `0` on full acceptance, otherwise the number of rejected
/// lines (capped so the code stays a valid exit status).
pub fn run() -> u8 {
    let cli = Cli::parse();
    run_with(&cli)
}

const GRAMMAR_ERROR_CODE: u8 = 2;
const CONFLICT_ERROR_CODE: u8 = 3;
const MAX_REJECT_CODE: u8 = 100;

fn run_with(cli: &Cli) -> u8 {
    let grammar = match load_grammar(cli) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("grammar error: {e}");
            return GRAMMAR_ERROR_CODE;
        }
    };

    let tables = match build_tables(cli, &grammar) {
        Ok(t) => t,
        Err(TableError::Conflict(e)) => {
            eprintln!("conflict building {} table: {e}", construction_name(cli));
            return CONFLICT_ERROR_CODE;
        }
        Err(TableError::Grammar(e)) => {
            eprintln!("grammar error: {e}");
            return GRAMMAR_ERROR_CODE;
        }
    };

    let input = match std::fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error reading input file {}: {e}", cli.input.display());
            return GRAMMAR_ERROR_CODE;
        }
    };

    run_input(&grammar, &tables, &input)
}

#[instrument(skip(cli), fields(grammar = %cli.grammar.display()))]
fn load_grammar(cli: &Cli) -> crate::error::Result<Grammar> {
    let grammar = loader::load_file(&cli.grammar, cli.start.as_deref())?;
    info!(
        nonterminals = grammar.nonterminals().count(),
        terminals = grammar.terminals().len(),
        "loaded grammar"
    );
    Ok(grammar.augment())
}

#[instrument(skip(cli, grammar))]
fn build_tables(cli: &Cli, grammar: &Grammar) -> Result<Tables, TableError> {
    let tables = if cli.lr0 {
        table::build_lr0(grammar)?
    } else {
        table::build_lr1(grammar)?
    };
    info!(
        states = tables.state_count,
        kind = construction_name(cli),
        "built tables"
    );
    Ok(tables)
}

fn construction_name(cli: &Cli) -> &'static str {
    if cli.lr0 { "LR(0)" } else { "LR(1)" }
}

fn run_input(grammar: &Grammar, tables: &Tables, input: &str) -> u8 {
    let parser = Parser::new(tables, grammar);
    let mut rejected = 0u32;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let symbols: Vec<Symbol> = line.split_whitespace().map(Symbol::terminal).collect();

        match parser.parse(&symbols) {
            Ok(()) => {
                debug!(line_no, "accept");
                println!("line {line_no}: accept");
            }
            Err(e) => {
                warn!(line_no, error = %e, "reject");
                println!("line {line_no}: reject ({e})");
                rejected += 1;
            }
        }
    }

    rejected.min(MAX_REJECT_CODE as u32) as u8
}
