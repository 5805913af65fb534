//! Error types for the CFG parser.
//!
//! Three independent error domains, matching the three places things can
//! go wrong: building the grammar (or loading it from text), building the
//! ACTION/GOTO tables, and driving a parse over a table. A construction
//! error is fatal to whatever was being built; a parse error is fatal only
//! to the current `parse` call.

use thiserror::Error;

/// Errors raised by the grammar data model and by the grammar-file loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("grammar has no productions")]
    EmptyGrammar,

    #[error("non-terminal '{0}' has no productions")]
    NoProductions(String),

    #[error("symbol '{0}' does not appear in the grammar")]
    UnknownSymbol(String),

    #[error("start non-terminal '{0}' does not have exactly one production after augmentation")]
    NotAugmented(String),

    #[error("the reserved end-of-input token '{0}' cannot be used as a grammar symbol")]
    ReservedEndToken(String),

    #[error("malformed production block at line {line}: {reason}")]
    MalformedBlock { line: usize, reason: String },

    #[error("unterminated production block starting at line {line} (missing ';')")]
    UnterminatedBlock { line: usize },

    #[error("I/O error reading grammar source: {0}")]
    Io(String),
}

impl From<std::io::Error> for GrammarError {
    fn from(e: std::io::Error) -> Self {
        GrammarError::Io(e.to_string())
    }
}

/// Raised when table construction finds two different actions (or two
/// different goto targets) contesting the same cell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("conflict in state {state} on symbol '{symbol}': {existing} vs {new}")]
pub struct ConflictError {
    pub state: usize,
    pub symbol: String,
    pub existing: String,
    pub new: String,
}

/// Raised by the parse driver when the table has no entry for the current
/// `(state, symbol)` pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no action for state {state} on symbol '{symbol}' (input position {position})")]
    NoAction {
        state: usize,
        symbol: String,
        position: usize,
    },

    #[error("no goto transition from state {state} on non-terminal '{symbol}'")]
    NoGoto { state: usize, symbol: String },
}

/// Result alias for grammar construction and loading.
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Raised by table construction, which can fail either because the grammar
/// was never augmented or because the canonical collection produced a
/// genuine conflict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),
}
