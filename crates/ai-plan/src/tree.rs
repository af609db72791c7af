use core::fmt;

use crate::{ActionDescriptor, ChoiceRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Goal-directed plan as produced by the planner.
///
/// `Sequence` children run in order. `Alternative` picks one direct child uniformly at random
/// every time the node is flattened, so unreached branches never materialize. `Unknown` stands
/// for any node kind the decoder does not understand and contributes no actions, including
/// leaves nested under it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlanTreeNode {
    Leaf(ActionDescriptor),
    Sequence(Vec<PlanTreeNode>),
    Alternative(Vec<PlanTreeNode>),
    Unknown {
        kind: String,
        children: Vec<PlanTreeNode>,
    },
}

impl PlanTreeNode {
    pub fn leaf(action: ActionDescriptor) -> Self {
        PlanTreeNode::Leaf(action)
    }

    pub fn sequence(children: impl IntoIterator<Item = PlanTreeNode>) -> Self {
        PlanTreeNode::Sequence(children.into_iter().collect())
    }

    pub fn alternative(children: impl IntoIterator<Item = PlanTreeNode>) -> Self {
        PlanTreeNode::Alternative(children.into_iter().collect())
    }

    /// Actions in execution order. Alternatives are resolved now, with `rng`.
    pub fn flatten<R: ChoiceRng + ?Sized>(&self, rng: &mut R) -> Vec<ActionDescriptor> {
        let mut out = Vec::new();
        self.flatten_into(rng, &mut out);
        out
    }

    pub fn flatten_into<R: ChoiceRng + ?Sized>(&self, rng: &mut R, out: &mut Vec<ActionDescriptor>) {
        match self {
            PlanTreeNode::Leaf(action) => out.push(action.clone()),
            PlanTreeNode::Sequence(children) => {
                for child in children {
                    child.flatten_into(rng, out);
                }
            }
            PlanTreeNode::Alternative(children) => {
                if let Some(index) = rng.pick(children.len()) {
                    children[index].flatten_into(rng, out);
                }
            }
            PlanTreeNode::Unknown { .. } => {}
        }
    }

    /// Number of leaves anywhere in the tree, reachable or not.
    pub fn leaf_count(&self) -> usize {
        match self {
            PlanTreeNode::Leaf(_) => 1,
            PlanTreeNode::Sequence(children)
            | PlanTreeNode::Alternative(children)
            | PlanTreeNode::Unknown { children, .. } => {
                children.iter().map(PlanTreeNode::leaf_count).sum()
            }
        }
    }
}

pub fn flatten<R: ChoiceRng + ?Sized>(root: &PlanTreeNode, rng: &mut R) -> Vec<ActionDescriptor> {
    root.flatten(rng)
}

impl fmt::Display for PlanTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, children: &[PlanTreeNode], sep: &str) -> fmt::Result {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{child}")?;
            }
            Ok(())
        }

        match self {
            PlanTreeNode::Leaf(action) => write!(f, "{}", action.name),
            PlanTreeNode::Sequence(children) => {
                f.write_str("seq[")?;
                list(f, children, ", ")?;
                f.write_str("]")
            }
            PlanTreeNode::Alternative(children) => {
                f.write_str("alt[")?;
                list(f, children, " | ")?;
                f.write_str("]")
            }
            PlanTreeNode::Unknown { kind, .. } => write!(f, "?{kind}"),
        }
    }
}
