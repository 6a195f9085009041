use std::collections::{HashMap, HashSet};

use super::{END_MARK, END_MARK_IDX, EPSILON, EPSILON_IDX};

#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    pub first: HashSet<usize>,
    pub follow: HashSet<usize>,
    pub nullable: bool,
    pub productions: Vec<Vec<usize>>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            first: HashSet::new(),
            follow: HashSet::new(),
            nullable: false,
            productions: Vec::new(),
        }
    }
}

/// A grammar symbol. The epsilon marker and the end-of-input marker occupy
/// reserved slots in every grammar, so productions can refer to them by
/// index like any other symbol.
#[derive(Debug, Clone)]
pub enum Symbol {
    Epsilon,
    EndMark,
    Terminal(String),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub start_symbol: Option<usize>,
    pub(super) nff_valid: bool,
}

impl Grammar {
    pub fn new() -> Self {
        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            start_symbol: None,
            nff_valid: false,
        };

        g.symbols.push(Symbol::Epsilon);
        g.symbol_table.insert(EPSILON.to_string(), EPSILON_IDX);
        g.symbols.push(Symbol::EndMark);
        g.symbol_table.insert(END_MARK.to_string(), END_MARK_IDX);

        g
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.symbols.iter().enumerate().filter_map(|(i, s)| {
            if let Symbol::Terminal(name) = s {
                Some((i, name.as_str()))
            } else {
                None
            }
        })
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols.iter().filter_map(|s| s.non_terminal())
    }

    pub fn non_terminal_iter_mut(&mut self) -> impl Iterator<Item = &mut NonTerminal> {
        self.symbols.iter_mut().filter_map(|s| s.mut_non_terminal())
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        self.nff_valid = false;
        idx
    }

    pub fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        self.nff_valid = false;
        idx
    }

    pub fn add_production(&mut self, left: usize, right: Vec<usize>) {
        self.symbols[left]
            .mut_non_terminal()
            .unwrap()
            .productions
            .push(right);
        self.nff_valid = false;
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::Epsilon => EPSILON,
            Symbol::EndMark => END_MARK,
            Symbol::Terminal(e) => e.as_str(),
            Symbol::NonTerminal(e) => e.name.as_str(),
        }
    }

    /// Synthesized names must not collide with anything already in the
    /// grammar, including previously synthesized non-terminals.
    pub fn get_symbol_prime_name(&self, mut name: String) -> String {
        while self.symbol_table.contains_key(&name) {
            name.push('\'');
        }
        name
    }

    pub fn production_to_vec_str(&self, production: &[usize]) -> Vec<&str> {
        production.iter().map(|&i| self.get_symbol_name(i)).collect()
    }
}
