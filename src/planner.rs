//! Planner: turns the node graph behind a terminal into an executable chain.
//!
//! The planner walks edges backwards from the terminal node to its source and
//! applies one rewrite:
//!
//! * **Fuse stateless ops** -- adjacent `Node::Stateless` blocks are
//!   concatenated into a single [`Step::Fused`], so a parallel leaf runs the
//!   whole run of filter/map/flat_map/peek stages in one pass.
//!
//! Stateful nodes stay separate as [`Step::Barrier`]s. The planner also
//! produces a human-readable [`PlanExplanation`].

use crate::error::StreamError;
use crate::node::{DynOp, Node};
use crate::runner::ExecMode;
use crate::type_token::{SourceOps, TypeTag};
use crate::{NodeId, Pipeline};
use anyhow::{Result, bail};
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::sync::Arc;
use tracing::debug;

/// One executable step after fusion.
#[derive(Clone)]
pub enum Step {
    /// Stateless ops applied per leaf, in order.
    Fused(Vec<Arc<dyn DynOp>>),
    /// Stateful op that must observe every upstream element.
    Barrier(Arc<dyn DynOp>),
}

/// A finalized execution plan: the source plus a linear chain of steps.
pub struct Plan {
    pub source: Arc<dyn SourceOps>,
    pub source_label: String,
    pub elem_tag: TypeTag,
    pub steps: Vec<Step>,
    /// Number of stateless blocks before fusion.
    pub blocks_before_fusion: usize,
}

/// Build the plan for the chain ending at `terminal`.
///
/// # Errors
/// If the chain references a missing node or does not start at a source.
pub fn build_plan(p: &Pipeline, terminal: NodeId) -> Result<Plan> {
    let (mut nodes, edges) = p.snapshot();

    // Linear backwalk: terminal → … → source
    let mut chain: Vec<Node> = Vec::new();
    let mut cur = terminal;
    loop {
        let n = nodes.remove(&cur).ok_or(StreamError::MissingNode(cur))?;
        chain.push(n);
        match edges.iter().find(|(_, to)| *to == cur) {
            Some((from, _)) => cur = *from,
            None => break,
        }
    }
    chain.reverse();

    let mut it = chain.into_iter();
    let Some(Node::Source {
        ops,
        elem_tag,
        label,
    }) = it.next()
    else {
        bail!("plan must start with a Source node");
    };

    let mut steps: Vec<Step> = Vec::new();
    let mut blocks_before_fusion = 0usize;
    for node in it {
        match node {
            Node::Stateless(ops) => {
                blocks_before_fusion += 1;
                if let Some(Step::Fused(prev)) = steps.last_mut() {
                    prev.extend(ops);
                } else {
                    steps.push(Step::Fused(ops));
                }
            }
            Node::Stateful(op) => steps.push(Step::Barrier(op)),
            Node::Source { .. } => bail!("unexpected additional source in plan"),
        }
    }

    debug!(
        source = %label,
        steps = steps.len(),
        fused_from = blocks_before_fusion,
        "built plan"
    );

    Ok(Plan {
        source: ops,
        source_label: label,
        elem_tag,
        steps,
        blocks_before_fusion,
    })
}

impl Plan {
    /// Describe this plan for the given execution mode.
    #[must_use]
    pub fn explain(&self, mode: ExecMode) -> PlanExplanation {
        let mut steps = vec![ExplainStep {
            step: 0,
            node_type: "Source".to_string(),
            description: format!("{} of {}", self.source_label, self.elem_tag.name),
            is_barrier: false,
        }];
        for step in &self.steps {
            let (node_type, description, is_barrier) = match step {
                Step::Fused(ops) => (
                    "Stateless",
                    ops.iter().map(|op| op.name()).collect::<Vec<_>>().join(" → "),
                    false,
                ),
                Step::Barrier(op) => ("Stateful", op.name().to_string(), true),
            };
            steps.push(ExplainStep {
                step: steps.len(),
                node_type: node_type.to_string(),
                description,
                is_barrier,
            });
        }
        PlanExplanation {
            mode,
            source_size: self.source.estimate_size(),
            barriers: steps.iter().filter(|s| s.is_barrier).count(),
            fused_blocks: (self.blocks_before_fusion, self.steps.iter().filter(|s| matches!(s, Step::Fused(_))).count()),
            steps,
        }
    }
}

/// A single step in an explained plan.
#[derive(Debug, Clone)]
pub struct ExplainStep {
    /// Step number in the execution sequence.
    pub step: usize,
    /// Type of node being executed.
    pub node_type: String,
    /// Human-readable description of the operation.
    pub description: String,
    /// Whether this step needs every upstream element before emitting.
    pub is_barrier: bool,
}

/// Human-readable description of an execution plan.
#[derive(Debug, Clone)]
pub struct PlanExplanation {
    pub mode: ExecMode,
    /// Source size estimate; `None` for unknown or unbounded sources.
    pub source_size: Option<usize>,
    pub barriers: usize,
    /// Stateless blocks before and after fusion.
    pub fused_blocks: (usize, usize),
    pub steps: Vec<ExplainStep>,
}

impl Display for PlanExplanation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        writeln!(f, "┌─ EXECUTION PLAN ─────────────────────────────────────────────┐")?;
        writeln!(f, "│ Mode:              {:?}", self.mode)?;
        writeln!(
            f,
            "│ Source Size:       {:>10}",
            self.source_size
                .map_or_else(|| "Unbounded".to_string(), |s| s.to_string())
        )?;
        writeln!(f, "│ Barrier Ops:       {:>10}", self.barriers)?;
        let (before, after) = self.fused_blocks;
        if before > after {
            writeln!(f, "│ Fused Stateless:   {before} blocks → {after} blocks")?;
        }
        for step in &self.steps {
            let barrier_marker = if step.is_barrier { " [BARRIER]" } else { "" };
            writeln!(f, "│")?;
            writeln!(f, "│ Step {}: {}{}", step.step, step.node_type, barrier_marker)?;
            writeln!(f, "│   {}", step.description)?;
        }
        writeln!(f, "└──────────────────────────────────────────────────────────────┘")
    }
}
