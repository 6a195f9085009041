use std::error;
use std::fmt::{self, Display};

/// Failures of the grammar itself: the transformations and the table
/// builder reject the grammar instead of producing a broken artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A left-recursive non-terminal has no non-recursive production, so it
    /// cannot derive any finite string.
    NoBaseCase(String),
    /// Two productions claim the same parsing-table cell: the grammar is
    /// not LL(1).
    Conflict {
        non_terminal: String,
        lookahead: String,
        existing: String,
        incoming: String,
    },
    NoStartSymbol,
    ReservedName(String),
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrammarError::NoBaseCase(name) => {
                write!(
                    f,
                    "non-terminal {} is left recursive but has no base production",
                    name
                )
            }
            GrammarError::Conflict {
                non_terminal,
                lookahead,
                existing,
                incoming,
            } => {
                write!(
                    f,
                    "grammar is not LL(1): table[{}][{}] selects both {} -> {} and {} -> {}",
                    non_terminal, lookahead, non_terminal, existing, non_terminal, incoming
                )
            }
            GrammarError::NoStartSymbol => write!(f, "start symbol is not set"),
            GrammarError::ReservedName(name) => {
                write!(f, "{} is reserved and cannot be used as a grammar symbol", name)
            }
        }
    }
}

impl error::Error for GrammarError {}

/// Failures of one parse run over one input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    UnexpectedSymbol { symbol: String, position: usize },
    UnexpectedEndOfInput,
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyntaxError::UnexpectedSymbol { symbol, position } => {
                write!(f, "unexpected symbol {} at position {}", symbol, position)
            }
            SyntaxError::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
        }
    }
}

impl error::Error for SyntaxError {}
