//! Plan-tree primitives for tick-driven action selection.
//!
//! A planner deposits a tree of sequence/alternative/leaf nodes; this crate turns it into a flat,
//! ordered stream of dispatchable actions one subtree at a time.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod handle;
pub mod plan;
pub mod queue;
pub mod rng;
pub mod tick;
pub mod tree;

pub use action::{ActionDescriptor, ActionKind, Argument, SAY_ACTION};
pub use handle::Handle;
pub use plan::Plan;
pub use queue::ResidualQueue;
pub use rng::{ChoiceRng, SplitMix64};
pub use tick::TickContext;
pub use tree::{flatten, PlanTreeNode};
