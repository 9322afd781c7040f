use crate::pipeline::{Operand, Pipeline, Step};
use crate::table::DcfTable;
use std::collections::HashMap;
use std::fmt::Write;

/// Explains how a row was derived: its formula, each input's first-year value,
/// and recursively the inputs of those inputs, down to raw assumptions.
pub fn format_trace(
    pipeline: &Pipeline,
    table: &DcfTable,
    rates: Option<&DcfTable>,
    target: &str,
) -> String {
    let mut tracer = Tracer {
        pipeline,
        table,
        rates,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    if table.contains_row(target) || pipeline.step_for(target).is_some() {
        let _ = writeln!(tracer.output, "AUDIT TRACE for row '{}':", target);
        let _ = writeln!(tracer.output, "--------------------------------------------------");
        tracer.trace_node(&Operand::row(target.to_string()), 1, "");
    } else {
        let _ = writeln!(tracer.output, "Error: Unknown row '{}'", target);
    }
    tracer.output
}

struct Tracer<'a> {
    pipeline: &'a Pipeline,
    table: &'a DcfTable,
    rates: Option<&'a DcfTable>,
    visited_at_level: HashMap<Operand, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_node(&mut self, operand: &Operand, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(operand) {
            let _ = writeln!(self.output, "{}[L{}] {} -> (Ref to L{})", prefix, level, operand, first_seen);
            return;
        }
        self.visited_at_level.insert(operand.clone(), level);

        let line_header = format!("[L{}] {}{}", level, operand, self.format_value(operand));

        match self.producing_step(operand) {
            Some(step) => {
                let formula = self.format_formula(step);
                let _ = writeln!(self.output, "{}{} = {}", prefix, line_header, formula);
                let children: Vec<Operand> = step.operands().cloned().collect();
                self.recurse_children(prefix, &children, level);
            }
            None => {
                let _ = writeln!(self.output, "{}{} -> Input", prefix, line_header);
            }
        }
    }

    fn producing_step(&self, operand: &Operand) -> Option<&'a Step> {
        match operand {
            Operand::Row(label) => self.pipeline.step_for(label),
            Operand::Rate(_) => None,
        }
    }

    fn recurse_children(&mut self, prefix: &str, children: &[Operand], level: usize) {
        let stem = self.build_child_stem(prefix);
        for (i, child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_node(child, level + 1, &full_prefix);
        }
    }

    fn format_formula(&self, step: &Step) -> String {
        let mut s = self.format_operand_ref(step.base());
        for term in step.terms() {
            let _ = write!(s, " {} {}", term.op, self.format_operand_ref(&term.operand));
        }
        s
    }

    fn format_operand_ref(&self, operand: &Operand) -> String {
        format!("{}{}", operand, self.format_value(operand))
    }

    fn format_value(&self, operand: &Operand) -> String {
        let source = match operand {
            Operand::Row(_) => Some(self.table),
            Operand::Rate(_) => self.rates,
        };
        let Some(row) = source.and_then(|t| t.row(operand.label())) else {
            return "[?]".to_string();
        };
        match row {
            [] => "[]".to_string(),
            [Some(v)] => format!("[{:.3}]", v),
            [Some(v), ..] => format!("[{:.3}, ...]", v),
            [None, ..] => "[unset]".to_string(),
        }
    }

    fn build_child_stem(&self, current_prefix: &str) -> String {
        current_prefix.replace("`--", "   ").replace("|--", "|  ")
    }
}
