use std::collections::HashMap;

use super::{Grammar, EPSILON_IDX};

impl Grammar {
    /// One round of left factoring per non-terminal: alternatives sharing a
    /// leading symbol are collapsed into `head A'` with a fresh `A'` per
    /// group. Prefixes that only become common after this rewrite are not
    /// factored again.
    pub fn left_factor(&self) -> Grammar {
        let mut g = self.clone();
        g.reset_nullable_first_follow();

        let nt_indices: Vec<usize> = g.non_terminal_iter().map(|nt| nt.index).collect();
        for idx in nt_indices {
            let productions = g.symbols[idx].non_terminal().unwrap().productions.clone();

            let mut group_order: Vec<usize> = Vec::new();
            let mut groups: HashMap<usize, Vec<Vec<usize>>> = HashMap::new();
            for production in productions {
                let head = production.first().cloned().unwrap_or(EPSILON_IDX);
                if !groups.contains_key(&head) {
                    group_order.push(head);
                }
                groups.entry(head).or_insert_with(Vec::new).push(production);
            }

            if group_order.len() <= 1 {
                continue;
            }

            let mut new_productions: Vec<Vec<usize>> = Vec::new();
            for head in group_order {
                let members = groups.remove(&head).unwrap();
                if members.len() == 1 {
                    new_productions.extend(members);
                    continue;
                }

                let prime_name = g.get_symbol_prime_name(g.get_symbol_name(idx).to_string());
                let prime_idx = g.add_non_terminal(&prime_name);
                new_productions.push(vec![head, prime_idx]);

                let prime_productions: Vec<Vec<usize>> = members
                    .into_iter()
                    .map(|member| {
                        let rest = member[1..].to_vec();
                        if rest.is_empty() {
                            vec![EPSILON_IDX]
                        } else {
                            rest
                        }
                    })
                    .collect();
                g.symbols[prime_idx].mut_non_terminal().unwrap().productions =
                    prime_productions;
            }

            g.symbols[idx].mut_non_terminal().unwrap().productions = new_productions;
        }

        g
    }
}
