extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{Grammar, GrammarError, SyntaxError};

use grammar::definition::GrammarDef;
use grammar::parse_tree::TreeNode;
use grammar::pretty_print::TraceOutput;

/// Loads a grammar definition and runs the transformation pipeline every
/// stage below expects: left-recursion elimination, then left factoring.
fn transformed_grammar(rules: &str) -> Result<Grammar, String> {
    let def: GrammarDef = serde_json::from_str(rules).map_err(|e| e.to_string())?;
    let g = Grammar::from_def(&def).map_err(|e| e.to_string())?;
    let g = g.eliminate_left_recursion().map_err(|e| e.to_string())?;
    Ok(g.left_factor())
}

fn error_json(e: String) -> String {
    format!("{{\"error\":\"{}\"}}", e)
}

#[wasm_bindgen]
pub fn transformed_grammar_to_json(rules: &str) -> String {
    match transformed_grammar(rules) {
        Ok(g) => serde_json::to_string(&g.to_production_output_vec()).unwrap(),
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn nullable_first_follow_to_json(rules: &str) -> String {
    match transformed_grammar(rules) {
        Ok(mut g) => {
            g.calculate_nullable_first_follow();
            g.to_non_terminal_output_vec().to_json()
        }
        Err(e) => error_json(e),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(rules: &str) -> String {
    let result = transformed_grammar(rules).and_then(|mut g| {
        let table = g.generate_ll1_table().map_err(|e| e.to_string())?;
        Ok(serde_json::to_string(&g.ll1_table_output(&table)).unwrap())
    });
    match result {
        Ok(s) => s,
        Err(e) => error_json(e),
    }
}

#[derive(serde::Serialize)]
struct ParseOutput<'a> {
    trace: TraceOutput<'a>,
    tree: TreeNode,
}

#[wasm_bindgen]
pub fn parse_to_json(rules: &str, input: &str) -> String {
    let result = transformed_grammar(rules).and_then(|mut g| {
        let table = g.generate_ll1_table().map_err(|e| e.to_string())?;
        let trace = g.parse(&table, input).map_err(|e| e.to_string())?;
        let tree = g.build_parse_tree(&trace)?;
        Ok(serde_json::to_string(&ParseOutput {
            trace: g.trace_output(&trace),
            tree,
        })
        .unwrap())
    });
    match result {
        Ok(s) => s,
        Err(e) => error_json(e),
    }
}



#[cfg(test)]
mod transform_tests {
    use crate::fixtures::*;
    use crate::grammar::definition::GrammarDef;
    use crate::grammar::{GrammarError, EPSILON_IDX};
    use crate::Grammar;

    #[test]
    fn elimination_is_identity_without_left_recursion() {
        let def = GrammarDef {
            rules: vec![rule("S", &[&["a", "S", "b"], &["c"]])],
        };
        let g = Grammar::from_def(&def).unwrap();
        let out = g.eliminate_left_recursion().unwrap();

        assert_eq!(out.symbols.len(), g.symbols.len());
        let s = out.get_symbol_index("S").unwrap();
        assert_eq!(
            out.symbols[s].non_terminal().unwrap().productions,
            g.symbols[s].non_terminal().unwrap().productions
        );
    }

    #[test]
    fn eliminates_immediate_left_recursion() {
        let g = Grammar::from_def(&classic_def())
            .unwrap()
            .eliminate_left_recursion()
            .unwrap();

        let e = g.get_symbol_index("E").unwrap();
        let e_prime = g.get_symbol_index("E'").unwrap();
        let t = g.get_symbol_index("T").unwrap();
        let plus = g.get_symbol_index("+").unwrap();

        assert_eq!(
            g.symbols[e].non_terminal().unwrap().productions,
            vec![vec![t, e_prime]]
        );
        assert_eq!(
            g.symbols[e_prime].non_terminal().unwrap().productions,
            vec![vec![plus, t, e_prime], vec![EPSILON_IDX]]
        );
    }

    #[test]
    fn no_production_keeps_its_owner_as_first_symbol() {
        let g = transformed_classic();
        for nt in g.non_terminal_iter() {
            for production in &nt.productions {
                assert_ne!(production.first(), Some(&nt.index), "{}", nt.name);
            }
        }
    }

    #[test]
    fn left_recursion_without_base_case_is_an_error() {
        let def = GrammarDef {
            rules: vec![rule("A", &[&["A", "a"]])],
        };
        let g = Grammar::from_def(&def).unwrap();
        assert_eq!(
            g.eliminate_left_recursion().unwrap_err(),
            GrammarError::NoBaseCase("A".to_string())
        );
    }

    #[test]
    fn left_factor_splits_common_prefix() {
        let def = GrammarDef {
            rules: vec![rule("S", &[&["a", "b"], &["a", "c"], &["d"]])],
        };
        let g = Grammar::from_def(&def).unwrap().left_factor();

        let s = g.get_symbol_index("S").unwrap();
        let s_prime = g.get_symbol_index("S'").unwrap();
        let a = g.get_symbol_index("a").unwrap();
        let b = g.get_symbol_index("b").unwrap();
        let c = g.get_symbol_index("c").unwrap();
        let d = g.get_symbol_index("d").unwrap();

        assert_eq!(
            g.symbols[s].non_terminal().unwrap().productions,
            vec![vec![a, s_prime], vec![d]]
        );
        assert_eq!(
            g.symbols[s_prime].non_terminal().unwrap().productions,
            vec![vec![b], vec![c]]
        );
    }

    #[test]
    fn left_factor_leaves_single_group_unchanged() {
        let def = GrammarDef {
            rules: vec![rule("S", &[&["a", "b"], &["a", "c"]])],
        };
        let g = Grammar::from_def(&def).unwrap();
        let out = g.left_factor();

        let s = out.get_symbol_index("S").unwrap();
        assert_eq!(out.symbols.len(), g.symbols.len());
        assert_eq!(
            out.symbols[s].non_terminal().unwrap().productions,
            g.symbols[s].non_terminal().unwrap().productions
        );
    }

    #[test]
    fn left_factor_turns_empty_remainder_into_epsilon() {
        let def = GrammarDef {
            rules: vec![rule("S", &[&["a"], &["a", "b"], &["c"]])],
        };
        let g = Grammar::from_def(&def).unwrap().left_factor();

        let s_prime = g.get_symbol_index("S'").unwrap();
        let b = g.get_symbol_index("b").unwrap();
        assert_eq!(
            g.symbols[s_prime].non_terminal().unwrap().productions,
            vec![vec![EPSILON_IDX], vec![b]]
        );
    }

    #[test]
    fn synthesized_names_never_collide() {
        let def = GrammarDef {
            rules: vec![
                rule("S", &[&["a", "b"], &["a", "c"], &["d"]]),
                rule("S'", &[&["x"]]),
            ],
        };
        let g = Grammar::from_def(&def).unwrap().left_factor();

        let s = g.get_symbol_index("S").unwrap();
        let fresh = g.get_symbol_index("S''").unwrap();
        let a = g.get_symbol_index("a").unwrap();
        assert_eq!(
            g.symbols[s].non_terminal().unwrap().productions[0],
            vec![a, fresh]
        );
    }
}

#[cfg(test)]
mod first_follow_tests {
    use std::collections::HashSet;

    use crate::fixtures::*;
    use crate::grammar::END_MARK_IDX;

    #[test]
    fn terminal_first_is_itself() {
        let g = transformed_classic();
        let plus = g.get_symbol_index("+").unwrap();
        assert_eq!(
            g.calculate_first_for_production(&[plus]),
            HashSet::from([plus])
        );
    }

    #[test]
    fn classic_first_sets() {
        let mut g = transformed_classic();
        g.calculate_nullable_first_follow();

        let lparen = g.get_symbol_index("(").unwrap();
        let id = g.get_symbol_index("id").unwrap();
        let plus = g.get_symbol_index("+").unwrap();
        let star = g.get_symbol_index("*").unwrap();

        let e = g.symbols[g.get_symbol_index("E").unwrap()].non_terminal().unwrap();
        assert_eq!(e.first, HashSet::from([lparen, id]));
        assert!(!e.nullable);

        let e_prime = g.symbols[g.get_symbol_index("E'").unwrap()]
            .non_terminal()
            .unwrap();
        assert_eq!(e_prime.first, HashSet::from([plus]));
        assert!(e_prime.nullable);

        let t_prime = g.symbols[g.get_symbol_index("T'").unwrap()]
            .non_terminal()
            .unwrap();
        assert_eq!(t_prime.first, HashSet::from([star]));
        assert!(t_prime.nullable);
    }

    #[test]
    fn classic_follow_sets() {
        let mut g = transformed_classic();
        g.calculate_nullable_first_follow();

        let rparen = g.get_symbol_index(")").unwrap();
        let plus = g.get_symbol_index("+").unwrap();
        let star = g.get_symbol_index("*").unwrap();

        let follow_of = |name: &str| {
            g.symbols[g.get_symbol_index(name).unwrap()]
                .non_terminal()
                .unwrap()
                .follow
                .clone()
        };

        assert_eq!(follow_of("E"), HashSet::from([END_MARK_IDX, rparen]));
        assert_eq!(follow_of("E'"), HashSet::from([END_MARK_IDX, rparen]));
        assert_eq!(follow_of("T"), HashSet::from([plus, END_MARK_IDX, rparen]));
        assert_eq!(
            follow_of("F"),
            HashSet::from([star, plus, END_MARK_IDX, rparen])
        );
    }
}


#[cfg(test)]
mod parse_tests {
    use crate::fixtures::*;
    use crate::grammar::definition::GrammarDef;
    use crate::grammar::{SyntaxError, EPSILON_IDX};
    use crate::Grammar;

    #[test]
    fn accepts_classic_input() {
        let mut g = transformed_classic();
        let table = g.generate_ll1_table().unwrap();
        let trace = g.parse(&table, "id+id*id").unwrap();

        let e = g.get_symbol_index("E").unwrap();
        let e_prime = g.get_symbol_index("E'").unwrap();
        let t = g.get_symbol_index("T").unwrap();

        assert_eq!(trace.steps.len(), 11);
        assert_eq!(trace.steps[0].non_terminal, e);
        assert_eq!(trace.steps[0].production, vec![t, e_prime]);
        assert_eq!(trace.steps[10].non_terminal, e_prime);
        assert_eq!(trace.steps[10].production, vec![EPSILON_IDX]);
    }

    #[test]
    fn premature_end_of_input() {
        let mut g = transformed_classic();
        let table = g.generate_ll1_table().unwrap();
        assert_eq!(
            g.parse(&table, "id+"),
            Err(SyntaxError::UnexpectedEndOfInput)
        );
    }

    #[test]
    fn missing_operand_is_reported_at_the_operator() {
        let mut g = transformed_classic();
        let table = g.generate_ll1_table().unwrap();
        assert_eq!(
            g.parse(&table, "id+*id"),
            Err(SyntaxError::UnexpectedSymbol {
                symbol: "*".to_string(),
                position: 3,
            })
        );
    }

    #[test]
    fn input_left_over_after_acceptance_point() {
        let mut g = transformed_classic();
        let table = g.generate_ll1_table().unwrap();
        assert_eq!(
            g.parse(&table, "id)"),
            Err(SyntaxError::UnexpectedSymbol {
                symbol: ")".to_string(),
                position: 2,
            })
        );
    }

    #[test]
    fn character_outside_the_terminal_set() {
        let mut g = transformed_classic();
        let table = g.generate_ll1_table().unwrap();
        assert_eq!(
            g.parse(&table, "x"),
            Err(SyntaxError::UnexpectedSymbol {
                symbol: "x".to_string(),
                position: 0,
            })
        );
    }

    #[test]
    fn empty_input_needs_more_than_it_got() {
        let mut g = transformed_classic();
        let table = g.generate_ll1_table().unwrap();
        assert_eq!(g.parse(&table, ""), Err(SyntaxError::UnexpectedEndOfInput));
    }

    #[test]
    fn nullable_start_accepts_empty_input() {
        let def = GrammarDef {
            rules: vec![rule("S", &[&["a", "S"], &["ε"]])],
        };
        let mut g = Grammar::from_def(&def).unwrap();
        let table = g.generate_ll1_table().unwrap();

        let trace = g.parse(&table, "").unwrap();
        assert_eq!(trace.steps.len(), 1);
        assert_eq!(trace.steps[0].production, vec![EPSILON_IDX]);

        let trace = g.parse(&table, "aa").unwrap();
        assert_eq!(trace.steps.len(), 3);
    }
}


#[cfg(test)]
mod render_tests {
    use crate::fixtures::*;

    #[test]
    fn productions_render_as_plaintext() {
        let g = transformed_classic();
        let text = g.to_production_output_vec().to_plaintext();
        assert!(text.contains("E -> T E'"));
        assert!(text.contains("| ε"));
    }

    #[test]
    fn table_renders_every_column() {
        let mut g = transformed_classic();
        let table = g.generate_ll1_table().unwrap();
        let text = g.ll1_table_output(&table).to_plaintext();

        let header = text.lines().next().unwrap();
        for name in ["+", "*", "(", ")", "id", "$"] {
            assert!(header.contains(name), "missing column {}", name);
        }
    }

    #[test]
    fn tree_renders_plaintext_and_dot() {
        let mut g = transformed_classic();
        let table = g.generate_ll1_table().unwrap();
        let trace = g.parse(&table, "id+id*id").unwrap();
        let tree = g.build_parse_tree(&trace).unwrap();

        let text = tree.to_plaintext();
        assert!(text.starts_with("`- E\n"));
        assert!(text.contains("|- T\n"));

        let dot = tree.to_graphviz();
        assert!(dot.starts_with("digraph parse_tree {"));
        assert!(dot.contains("n0 [label=\"E\"]"));
        assert!(dot.contains("n0 -> n1"));
    }

    #[test]
    fn wasm_surface_reports_errors_as_json() {
        let out = crate::parse_to_json(
            r#"{"rules":[{"left":"E","alternatives":[["E","+","T"],["T"]]},
                        {"left":"T","alternatives":[["T","*","F"],["F"]]},
                        {"left":"F","alternatives":[["(","E",")"],["id"]]}]}"#,
            "id+id*id",
        );
        assert!(out.contains("\"trace\""));
        assert!(out.contains("\"tree\""));

        let out = crate::ll1_table_to_json(r#"{"rules":[{"left":"A","alternatives":[["A","a"]]}]}"#);
        assert!(out.contains("\"error\""));
    }
}
