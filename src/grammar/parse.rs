use super::{
    error::SyntaxError, grammar::Symbol, ll1_table::LL1Table, Grammar, END_MARK_IDX, EPSILON_IDX,
};

/// One expansion performed during a parse: which non-terminal was on top of
/// the stack and which of its productions the table selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationStep {
    pub non_terminal: usize,
    pub production: Vec<usize>,
}

/// Ordered record of every expansion of one parse run; the only artifact
/// the tree builder needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationTrace {
    pub steps: Vec<DerivationStep>,
}

impl Grammar {
    /// Table-driven predictive parse of `input`.
    ///
    /// The grammar's terminals double as the token set: at each cursor
    /// position the longest terminal prefixing the remaining input is the
    /// current token, and the end marker stands in once the input is
    /// exhausted.
    pub fn parse(&self, table: &LL1Table, input: &str) -> Result<DerivationTrace, SyntaxError> {
        let mut lexicon: Vec<(usize, &str)> = self.terminal_iter().collect();
        lexicon.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        let mut stack: Vec<usize> = vec![END_MARK_IDX, table.start];
        let mut cursor: usize = 0;
        let mut trace = DerivationTrace::default();

        while let Some(&top) = stack.last() {
            let lookahead: Option<(usize, usize)> = if cursor >= input.len() {
                Some((END_MARK_IDX, 0))
            } else {
                lexicon
                    .iter()
                    .find(|(_, t)| input[cursor..].starts_with(t))
                    .map(|&(idx, t)| (idx, t.len()))
            };

            match &self.symbols[top] {
                Symbol::Epsilon => {
                    stack.pop();
                }
                Symbol::EndMark => {
                    return match lookahead {
                        Some((END_MARK_IDX, _)) => Ok(trace),
                        _ => Err(SyntaxError::UnexpectedSymbol {
                            symbol: self.lookahead_name(input, cursor, lookahead),
                            position: cursor,
                        }),
                    };
                }
                Symbol::Terminal(_) => match lookahead {
                    Some((idx, len)) if idx == top => {
                        cursor += len;
                        stack.pop();
                    }
                    Some((END_MARK_IDX, _)) => return Err(SyntaxError::UnexpectedEndOfInput),
                    _ => {
                        return Err(SyntaxError::UnexpectedSymbol {
                            symbol: self.get_symbol_name(top).to_string(),
                            position: cursor,
                        })
                    }
                },
                Symbol::NonTerminal(_) => {
                    let la_idx = match lookahead {
                        Some((idx, _)) => idx,
                        None => {
                            return Err(SyntaxError::UnexpectedSymbol {
                                symbol: self.lookahead_name(input, cursor, lookahead),
                                position: cursor,
                            })
                        }
                    };

                    let production = match table.production(top, la_idx) {
                        Some(production) => production,
                        None if la_idx == END_MARK_IDX => {
                            return Err(SyntaxError::UnexpectedEndOfInput)
                        }
                        None => {
                            return Err(SyntaxError::UnexpectedSymbol {
                                symbol: self.get_symbol_name(la_idx).to_string(),
                                position: cursor,
                            })
                        }
                    };

                    stack.pop();
                    trace.steps.push(DerivationStep {
                        non_terminal: top,
                        production: production.clone(),
                    });
                    if !(production.len() == 1 && production[0] == EPSILON_IDX) {
                        stack.extend(production.iter().rev().copied());
                    }
                }
            }
        }

        // The end marker seeded at the bottom of the stack always resolves
        // the parse before the stack can drain.
        Err(SyntaxError::UnexpectedEndOfInput)
    }

    fn lookahead_name(&self, input: &str, cursor: usize, lookahead: Option<(usize, usize)>) -> String {
        match lookahead {
            Some((idx, _)) => self.get_symbol_name(idx).to_string(),
            None => input[cursor..]
                .chars()
                .next()
                .map(|c| c.to_string())
                .unwrap_or_default(),
        }
    }
}
