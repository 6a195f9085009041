use std::collections::HashMap;

use super::{error::GrammarError, Grammar, END_MARK_IDX};

/// LL(1) parsing table: one row per non-terminal, one column per terminal
/// plus the end marker, at most one production per cell. A missing cell is
/// a syntax error at that (non-terminal, lookahead) combination.
#[derive(Debug, Clone)]
pub struct LL1Table {
    pub start: usize,
    pub columns: Vec<usize>,
    pub rows: Vec<(usize, Vec<Option<Vec<usize>>>)>,
    col_of: HashMap<usize, usize>,
    row_of: HashMap<usize, usize>,
}

impl LL1Table {
    pub fn production(&self, non_terminal: usize, lookahead: usize) -> Option<&Vec<usize>> {
        let &r = self.row_of.get(&non_terminal)?;
        let &c = self.col_of.get(&lookahead)?;
        self.rows[r].1[c].as_ref()
    }
}

fn set_cell(
    g: &Grammar,
    cell: &mut Option<Vec<usize>>,
    left: &str,
    lookahead: usize,
    production: &[usize],
) -> Result<(), GrammarError> {
    match cell {
        Some(existing) if existing.as_slice() != production => Err(GrammarError::Conflict {
            non_terminal: left.to_string(),
            lookahead: g.get_symbol_name(lookahead).to_string(),
            existing: g.production_to_vec_str(existing).join(" "),
            incoming: g.production_to_vec_str(production).join(" "),
        }),
        _ => {
            *cell = Some(production.to_vec());
            Ok(())
        }
    }
}

impl Grammar {
    pub fn generate_ll1_table(&mut self) -> Result<LL1Table, GrammarError> {
        let start = self.start_symbol.ok_or(GrammarError::NoStartSymbol)?;
        if !self.is_nullable_first_follow_valid() {
            self.calculate_nullable_first_follow();
        }

        let mut columns: Vec<usize> = self.terminal_iter().map(|(i, _)| i).collect();
        columns.push(END_MARK_IDX);
        let col_of: HashMap<usize, usize> =
            columns.iter().enumerate().map(|(c, &i)| (i, c)).collect();

        let mut rows: Vec<(usize, Vec<Option<Vec<usize>>>)> = Vec::new();
        let mut row_of: HashMap<usize, usize> = HashMap::new();
        for nt in self.non_terminal_iter() {
            let left = nt.name.as_str();
            let mut row: Vec<Option<Vec<usize>>> = vec![None; columns.len()];

            for production in &nt.productions {
                for t in self.calculate_first_for_production(production) {
                    set_cell(self, &mut row[col_of[&t]], left, t, production)?;
                }

                // An ε-deriving production is chosen on everything that may
                // follow the non-terminal, end marker included.
                if self.production_nullable(production) {
                    for &t in &nt.follow {
                        set_cell(self, &mut row[col_of[&t]], left, t, production)?;
                    }
                }
            }

            row_of.insert(nt.index, rows.len());
            rows.push((nt.index, row));
        }

        Ok(LL1Table {
            start,
            columns,
            rows,
            col_of,
            row_of,
        })
    }
}
