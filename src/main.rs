pub mod grammar;

use std::{fs, io::BufRead};

use grammar::definition::GrammarDef;
pub use grammar::Grammar;

fn print_help() {
    println!("Usage: ll1-parsing-helper [actions] outputs [options] [grammar file]");
    println!("actions:");
    println!("  elr: Eliminate immediate left recursion");
    println!("  lf: Left factor common prefixes");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  nff: Nullable first and follow");
    println!("  ll1: LL(1) parsing table");
    println!("  trace: Derivation trace of the parsed input");
    println!("  tree: Parse tree of the parsed input");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -d: Print the parse tree in Graphviz DOT format");
    println!("  -i <input>: Input string to parse (trace and tree outputs)");
    println!("grammar file:");
    println!("  JSON rules, e.g. {{\"rules\":[{{\"left\":\"E\",\"alternatives\":[[\"E\",\"+\",\"T\"],[\"T\"]]}}]}}");
    println!("  Read from stdin when omitted");
}

fn exit_with(e: impl std::fmt::Display) -> ! {
    eprintln!("{}", e);
    std::process::exit(1);
}

fn read_input_string(cached: &Option<String>, grammar_from_stdin: bool) -> String {
    if let Some(s) = cached {
        return s.clone();
    }
    if grammar_from_stdin {
        exit_with("-i <input> is required when the grammar is read from stdin");
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .expect("Failed to read input");
    line.trim_end().to_string()
}

fn main() {
    let mut actions: Vec<&str> = Vec::new();
    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && ["elr", "lf"].contains(&args[i].as_str()) {
        actions.push(args[i].as_str());
        i += 1;
    }
    while i < args.len() && ["prod", "nff", "ll1", "trace", "tree"].contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    enum OutputFormat {
        Plain,
        LaTeX,
        JSON,
        Dot,
    }
    let mut output_format = OutputFormat::Plain;
    let mut input_string: Option<String> = None;

    while i < args.len() && ["-h", "--help", "-l", "-j", "-d", "-i"].contains(&args[i].as_str()) {
        if args[i] == "-h" || args[i] == "--help" {
            print_help();
            return;
        } else if args[i] == "-l" {
            output_format = OutputFormat::LaTeX;
        } else if args[i] == "-j" {
            output_format = OutputFormat::JSON;
        } else if args[i] == "-d" {
            output_format = OutputFormat::Dot;
        } else if args[i] == "-i" {
            i += 1;
            match args.get(i) {
                Some(s) => input_string = Some(s.clone()),
                None => exit_with("-i requires an input string"),
            }
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return;
    }

    let grammar_from_stdin = i == args.len();
    let rules: String = if grammar_from_stdin {
        std::io::stdin()
            .lock()
            .lines()
            .map(|l| l.unwrap())
            .collect::<Vec<String>>()
            .join("\n")
    } else {
        fs::read_to_string(args[i].as_str()).expect("Failed to read file")
    };

    let def: GrammarDef = serde_json::from_str(&rules).unwrap_or_else(|e| exit_with(e));
    let mut g = Grammar::from_def(&def).unwrap_or_else(|e| exit_with(e));

    for action in actions {
        if action == "elr" {
            g = g.eliminate_left_recursion().unwrap_or_else(|e| exit_with(e));
        }
        if action == "lf" {
            g = g.left_factor();
        }
    }

    let trace = if outputs.iter().any(|o| *o == "trace" || *o == "tree") {
        let table = g.generate_ll1_table().unwrap_or_else(|e| exit_with(e));
        let input = read_input_string(&input_string, grammar_from_stdin);
        Some(g.parse(&table, &input).unwrap_or_else(|e| exit_with(e)))
    } else {
        None
    };

    for output in outputs {
        if output == "prod" {
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t).unwrap(),
                    _ => t.to_plaintext(),
                }
            );
        }
        if output == "nff" {
            g.calculate_nullable_first_follow();
            let t = g.to_non_terminal_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t).unwrap(),
                    _ => t.to_plaintext(),
                }
            );
        }
        if output == "ll1" {
            let table = g.generate_ll1_table().unwrap_or_else(|e| exit_with(e));
            let t = g.ll1_table_output(&table);
            println!(
                "{}",
                match output_format {
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t).unwrap(),
                    _ => t.to_plaintext(),
                }
            );
        }
        if output == "trace" {
            let t = g.trace_output(trace.as_ref().unwrap());
            println!(
                "{}",
                match output_format {
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t).unwrap(),
                    _ => t.to_plaintext(),
                }
            );
        }
        if output == "tree" {
            let tree = g
                .build_parse_tree(trace.as_ref().unwrap())
                .unwrap_or_else(|e| exit_with(e));
            println!(
                "{}",
                match output_format {
                    OutputFormat::JSON => serde_json::to_string(&tree).unwrap(),
                    OutputFormat::Dot => tree.to_graphviz(),
                    _ => tree.to_plaintext(),
                }
            );
        }
    }
}
