//! Static checks on a pipeline definition, run before any table is touched.

use super::step::Step;
use crate::error::ErrorKind;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;
use thiserror::Error;

/// The specific category of a pipeline definition error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineErrorType {
    /// Two steps write the same row.
    DuplicateOutput,
    /// A step reads the row it writes.
    SelfReference,
    /// A step reads a row that only a later step produces.
    ForwardReference,
    /// Rows that depend on each other through several steps.
    Cycle,
}

/// A structured report from [`Pipeline::validate`](super::Pipeline::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{step}: {message}")]
pub struct PipelineError {
    /// Output row of the offending step.
    pub step: String,
    pub error_type: PipelineErrorType,
    pub message: String,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Value
    }
}

/// Collects every problem instead of stopping at the first one.
pub(crate) fn validate(steps: &[Step]) -> Result<(), Vec<PipelineError>> {
    let mut errors = Vec::new();

    // The first step writing a row is its producer.
    let mut producers: HashMap<&str, usize> = HashMap::new();
    for (i, step) in steps.iter().enumerate() {
        if let Some(&first) = producers.get(step.output()) {
            errors.push(PipelineError {
                step: step.output().to_string(),
                error_type: PipelineErrorType::DuplicateOutput,
                message: format!("row is already produced by step {}", first + 1),
            });
        } else {
            producers.insert(step.output(), i);
        }
    }

    // Rate operands come from a separate table and never create dependencies.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for (i, step) in steps.iter().enumerate() {
        graph.add_node(step.output());
        for operand in step.operands().filter(|o| !o.is_rate()) {
            let label = operand.label();
            if label == step.output() {
                errors.push(PipelineError {
                    step: step.output().to_string(),
                    error_type: PipelineErrorType::SelfReference,
                    message: "step reads its own output row".to_string(),
                });
                continue;
            }
            graph.add_edge(label, step.output(), ());
            if let Some(&j) = producers.get(label) {
                if j > i {
                    errors.push(PipelineError {
                        step: step.output().to_string(),
                        error_type: PipelineErrorType::ForwardReference,
                        message: format!("reads '{}', which is produced by later step {}", label, j + 1),
                    });
                }
            }
        }
    }

    for component in tarjan_scc(&graph) {
        if component.len() > 1 {
            let mut rows = component;
            rows.sort_by_key(|r| producers.get(r).copied().unwrap_or(usize::MAX));
            errors.push(PipelineError {
                step: rows[0].to_string(),
                error_type: PipelineErrorType::Cycle,
                message: format!("rows depend on each other: {:?}", rows),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
