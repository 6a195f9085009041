use std::collections::HashSet;

use super::{grammar::Symbol, Grammar, END_MARK_IDX};

impl Grammar {
    /// Recomputes the three derived sets from scratch, in dependency order.
    /// A grammar without a start symbol has nothing to anchor FOLLOW, so
    /// this is a no-op for it.
    pub fn calculate_nullable_first_follow(&mut self) {
        self.reset_nullable_first_follow();
        if let Some(start_idx) = self.start_symbol {
            self.symbols[start_idx]
                .mut_non_terminal()
                .unwrap()
                .follow
                .insert(END_MARK_IDX);
            self.calculate_nullable();
            self.calculate_first();
            self.calculate_follow();
            self.nff_valid = true;
        }
    }

    pub fn reset_nullable_first_follow(&mut self) {
        for nt in self.non_terminal_iter_mut() {
            nt.nullable = false;
            nt.first = HashSet::new();
            nt.follow = HashSet::new();
        }
        self.nff_valid = false;
    }

    pub fn is_nullable_first_follow_valid(&self) -> bool {
        self.nff_valid
    }

    fn calculate_nullable(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..self.symbols.len() {
                let nullable: bool = match &self.symbols[i] {
                    Symbol::Epsilon | Symbol::EndMark | Symbol::Terminal(_) => continue,
                    Symbol::NonTerminal(nt) => {
                        if nt.nullable {
                            continue;
                        }
                        nt.productions.iter().any(|production| {
                            production.iter().all(|s| match &self.symbols[*s] {
                                Symbol::Epsilon => true,
                                Symbol::EndMark | Symbol::Terminal(_) => false,
                                Symbol::NonTerminal(e) => e.nullable,
                            })
                        })
                    }
                };

                if nullable {
                    self.symbols[i].mut_non_terminal().unwrap().nullable = true;
                    changed = true;
                }
            }
        }
    }

    /// FIRST of a symbol string: leading symbols up to and including the
    /// first one that cannot derive ε. Epsilon markers contribute nothing
    /// by themselves; whether the whole string derives ε is
    /// `production_nullable`.
    pub fn calculate_first_for_production(&self, production: &[usize]) -> HashSet<usize> {
        let mut first: HashSet<usize> = HashSet::new();
        for (idx, symbol) in production.iter().map(|i| (*i, &self.symbols[*i])) {
            match symbol {
                Symbol::Epsilon => continue,
                Symbol::EndMark | Symbol::Terminal(_) => {
                    first.insert(idx);
                    break;
                }
                Symbol::NonTerminal(nt) => {
                    first.extend(nt.first.iter().cloned());
                    if !nt.nullable {
                        break;
                    }
                }
            }
        }
        first
    }

    pub fn production_nullable(&self, production: &[usize]) -> bool {
        production.iter().all(|s| match &self.symbols[*s] {
            Symbol::Epsilon => true,
            Symbol::EndMark | Symbol::Terminal(_) => false,
            Symbol::NonTerminal(nt) => nt.nullable,
        })
    }

    fn calculate_first(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..self.symbols.len() {
                let first: HashSet<usize> = match &self.symbols[i] {
                    Symbol::Epsilon | Symbol::EndMark | Symbol::Terminal(_) => continue,
                    Symbol::NonTerminal(nt) => {
                        nt.productions
                            .iter()
                            .fold(HashSet::new(), |mut first, production| {
                                first.extend(
                                    self.calculate_first_for_production(production).into_iter(),
                                );
                                first
                            })
                    }
                };

                let nt = self.symbols[i].mut_non_terminal().unwrap();
                if nt.first.len() != first.len() {
                    changed = true;
                    nt.first = first;
                }
            }
        }
    }

    fn calculate_follow(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;

            // Scan every production right to left, carrying the FIRST set
            // of the tail behind the cursor and whether that tail derives
            // ε. Additions are buffered so a set is never grown while
            // another occurrence of the same non-terminal is being read.
            let mut pending: Vec<(usize, HashSet<usize>)> = Vec::new();
            for left in self.non_terminal_iter() {
                for production in &left.productions {
                    let mut tail_first: HashSet<usize> = HashSet::new();
                    let mut tail_nullable = true;

                    for &idx in production.iter().rev() {
                        match &self.symbols[idx] {
                            Symbol::Epsilon => continue,
                            Symbol::EndMark | Symbol::Terminal(_) => {
                                tail_first = HashSet::from([idx]);
                                tail_nullable = false;
                            }
                            Symbol::NonTerminal(nt) => {
                                let mut addition = tail_first.clone();
                                if tail_nullable {
                                    addition.extend(left.follow.iter().cloned());
                                }
                                pending.push((nt.index, addition));

                                if nt.nullable {
                                    tail_first.extend(nt.first.iter().cloned());
                                } else {
                                    tail_first = nt.first.clone();
                                    tail_nullable = false;
                                }
                            }
                        }
                    }
                }
            }

            for (idx, addition) in pending {
                let nt = self.symbols[idx].mut_non_terminal().unwrap();
                let before = nt.follow.len();
                nt.follow.extend(addition);
                if nt.follow.len() != before {
                    changed = true;
                }
            }
        }
    }
}
