use serde::Serialize;

use super::{grammar::Symbol, parse::DerivationStep, parse::DerivationTrace, Grammar};

#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub symbol: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            children: Vec::new(),
        }
    }
}

impl Grammar {
    /// Rebuilds the parse tree from a derivation trace. Every non-terminal
    /// expansion consumes exactly one trace step, which must name that
    /// non-terminal; a trace that ends early, expands the wrong symbol, or
    /// has steps left over is rejected.
    pub fn build_parse_tree(&self, trace: &DerivationTrace) -> Result<TreeNode, String> {
        let start = self
            .start_symbol
            .ok_or_else(|| "start symbol is not set".to_string())?;

        let mut steps = trace.steps.iter();
        let root = self.build_subtree(&mut steps, start)?;
        if steps.next().is_some() {
            return Err("derivation trace has unconsumed steps".to_string());
        }
        Ok(root)
    }

    fn build_subtree(
        &self,
        steps: &mut std::slice::Iter<DerivationStep>,
        symbol: usize,
    ) -> Result<TreeNode, String> {
        let nt = match &self.symbols[symbol] {
            Symbol::NonTerminal(nt) => nt,
            _ => return Ok(TreeNode::leaf(self.get_symbol_name(symbol))),
        };

        let step = steps
            .next()
            .ok_or_else(|| format!("derivation trace ended while expanding {}", nt.name))?;
        if step.non_terminal != symbol {
            return Err(format!(
                "derivation trace expands {} where {} was expected",
                self.get_symbol_name(step.non_terminal),
                nt.name
            ));
        }

        let mut node = TreeNode {
            symbol: nt.name.clone(),
            children: Vec::with_capacity(step.production.len()),
        };
        for &s in &step.production {
            node.children.push(self.build_subtree(steps, s)?);
        }
        Ok(node)
    }
}
