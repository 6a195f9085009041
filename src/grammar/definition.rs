use serde::{Deserialize, Serialize};

use super::{error::GrammarError, Grammar, END_MARK, EPSILON, EPSILON_IDX};

/// In-memory grammar definition: an ordered list of rules, each mapping a
/// left-hand non-terminal to its alternatives. The first rule's left side
/// is the start symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarDef {
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    pub left: String,
    pub alternatives: Vec<Vec<String>>,
}

impl Grammar {
    pub fn from_def(def: &GrammarDef) -> Result<Self, GrammarError> {
        let mut g = Self::new();

        let mut lefts: Vec<usize> = Vec::new();
        for rule in &def.rules {
            if rule.left == EPSILON || rule.left == END_MARK {
                return Err(GrammarError::ReservedName(rule.left.clone()));
            }
            lefts.push(match g.get_symbol_index(&rule.left) {
                Some(idx) => idx,
                None => g.add_non_terminal(&rule.left),
            });
        }

        for (rule, &left) in def.rules.iter().zip(lefts.iter()) {
            for alternative in &rule.alternatives {
                let production = if alternative.is_empty() {
                    vec![EPSILON_IDX]
                } else {
                    let mut symbols = Vec::with_capacity(alternative.len());
                    for name in alternative {
                        if name == END_MARK {
                            return Err(GrammarError::ReservedName(name.clone()));
                        }
                        symbols.push(match g.get_symbol_index(name) {
                            Some(idx) => idx,
                            None => g.add_terminal(name.clone()),
                        });
                    }
                    symbols
                };
                g.add_production(left, production);
            }
        }

        g.start_symbol = lefts.first().cloned();

        Ok(g)
    }
}
