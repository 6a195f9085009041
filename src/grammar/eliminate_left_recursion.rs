use super::{error::GrammarError, Grammar, EPSILON_IDX};

impl Grammar {
    /// Rewrites every non-terminal with immediate left recursion into the
    /// right-recursive pair `A -> base A'`, `A' -> tail A' | ε`. Indirect
    /// recursion through other non-terminals is left untouched.
    pub fn eliminate_left_recursion(&self) -> Result<Grammar, GrammarError> {
        let mut g = self.clone();
        g.reset_nullable_first_follow();

        let nt_indices: Vec<usize> = g.non_terminal_iter().map(|nt| nt.index).collect();
        for idx in nt_indices {
            let nt = g.symbols[idx].non_terminal().unwrap();

            let mut bases: Vec<Vec<usize>> = Vec::new();
            let mut tails: Vec<Vec<usize>> = Vec::new();
            for production in &nt.productions {
                if production.first() == Some(&idx) {
                    tails.push(production[1..].to_vec());
                } else {
                    bases.push(production.clone());
                }
            }

            if tails.is_empty() {
                continue;
            }
            if bases.is_empty() {
                // A grammar whose every A-production recurses on A derives
                // no finite string from A; the caller has to fix it.
                return Err(GrammarError::NoBaseCase(nt.name.clone()));
            }

            let prime_name = g.get_symbol_prime_name(nt.name.clone());
            let prime_idx = g.add_non_terminal(&prime_name);

            let rewrite = |alternative: Vec<usize>| -> Vec<usize> {
                let mut p: Vec<usize> =
                    alternative.into_iter().filter(|&s| s != EPSILON_IDX).collect();
                p.push(prime_idx);
                p
            };

            let new_productions: Vec<Vec<usize>> = bases.into_iter().map(rewrite).collect();
            let mut prime_productions: Vec<Vec<usize>> =
                tails.into_iter().map(rewrite).collect();
            prime_productions.push(vec![EPSILON_IDX]);

            g.symbols[idx].mut_non_terminal().unwrap().productions = new_productions;
            g.symbols[prime_idx].mut_non_terminal().unwrap().productions = prime_productions;
        }

        Ok(g)
    }
}
