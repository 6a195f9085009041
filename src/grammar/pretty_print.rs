use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    ll1_table::LL1Table, parse::DerivationTrace, parse_tree::TreeNode, Grammar, EPSILON,
};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        (left + &right).replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.len())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .non_terminal_iter()
            .map(|nt| ProductionOutput {
                left: nt.name.as_str(),
                rights: nt
                    .productions
                    .iter()
                    .map(|p| self.production_to_vec_str(p))
                    .collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }
}

#[derive(Debug, Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", ")
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let mut data = Vec::new();
        for nt in self.non_terminal_iter() {
            let mut t = NonTerminalOutput {
                name: nt.name.as_str(),
                nullable: nt.nullable,
                first: nt.first.iter().map(|&i| self.get_symbol_name(i)).collect(),
                follow: nt.follow.iter().map(|&i| self.get_symbol_name(i)).collect(),
            };
            t.first.sort();
            t.follow.sort();

            if nt.nullable {
                t.first.push(EPSILON);
            }
            data.push(t);
        }
        NonTerminalOutputVec { data }
    }
}

#[derive(Debug, Serialize)]
pub struct LL1TableOutput<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<ProductionOutput<'a>>)>,
}

impl LL1TableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(row.iter().map(|cell| cell.to_plaintext(left.len(), false)));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| output.iter().map(|line| line[j].len()).max().unwrap())
            .collect();
        output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let content = self
            .rows
            .iter()
            .map(|(left, row)| {
                std::iter::once(escape::tex(*left).to_string())
                    .chain(row.iter().map(|cell| cell.to_latex(false)))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &content + "\n\\end{array}\\]"
    }
}

impl Grammar {
    pub fn ll1_table_output<'a>(&'a self, table: &'a LL1Table) -> LL1TableOutput<'a> {
        let terminals: Vec<&str> = table
            .columns
            .iter()
            .map(|&i| self.get_symbol_name(i))
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|(nt_idx, row)| {
                let left = self.get_symbol_name(*nt_idx);
                let cells = row
                    .iter()
                    .map(|cell| ProductionOutput {
                        left,
                        rights: cell
                            .iter()
                            .map(|p| self.production_to_vec_str(p))
                            .collect(),
                    })
                    .collect();
                (left, cells)
            })
            .collect();

        LL1TableOutput { terminals, rows }
    }
}

#[derive(Debug, Serialize)]
pub struct TraceOutput<'a> {
    steps: Vec<ProductionOutput<'a>>,
}

impl TraceOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self.steps.iter().map(|s| s.left.len()).max().unwrap_or(0);
        self.steps
            .iter()
            .map(|s| s.to_plaintext(left_max_len, false))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.steps.iter().map(|s| s.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn trace_output<'a>(&'a self, trace: &DerivationTrace) -> TraceOutput<'a> {
        let steps = trace
            .steps
            .iter()
            .map(|step| ProductionOutput {
                left: self.get_symbol_name(step.non_terminal),
                rights: vec![self.production_to_vec_str(&step.production)],
            })
            .collect();
        TraceOutput { steps }
    }
}

impl TreeNode {
    pub fn to_plaintext(&self) -> String {
        let mut output = String::new();
        self.write_plaintext(&mut output, "", true);
        output
    }

    fn write_plaintext(&self, output: &mut String, prefix: &str, is_last: bool) {
        output.push_str(prefix);
        output.push_str(if is_last { "`- " } else { "|- " });
        output.push_str(&self.symbol);
        output.push('\n');

        let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "|  " });
        for (i, child) in self.children.iter().enumerate() {
            child.write_plaintext(output, &child_prefix, i + 1 == self.children.len());
        }
    }

    /// DOT source for an external graph renderer.
    pub fn to_graphviz(&self) -> String {
        let mut output = String::from("digraph parse_tree {\n    node [shape=plaintext]\n");
        let mut next_id = 0;
        self.write_graphviz(&mut output, &mut next_id, None);
        output.push_str("}\n");
        output
    }

    fn write_graphviz(&self, output: &mut String, next_id: &mut usize, parent: Option<usize>) {
        let id = *next_id;
        *next_id += 1;

        let label = self.symbol.replace('\\', "\\\\").replace('"', "\\\"");
        output.push_str(&format!("    n{} [label=\"{}\"]\n", id, label));
        if let Some(parent) = parent {
            output.push_str(&format!("    n{} -> n{}\n", parent, id));
        }
        for child in &self.children {
            child.write_graphviz(output, next_id, Some(id));
        }
    }
}
