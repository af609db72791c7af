use crate::{ActionDescriptor, ChoiceRng, PlanTreeNode};

/// Unexecuted remainder of the current plan.
///
/// Both levels are stacks whose next element sits at the back. `pending_actions` is kept in
/// reverse execution order so popping yields a flattened subtree left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidualQueue {
    pending_trees: Vec<PlanTreeNode>,
    pending_actions: Vec<ActionDescriptor>,
}

impl ResidualQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly planned tree; any residue of the previous plan is discarded.
    pub fn replace(&mut self, root: PlanTreeNode) {
        self.pending_trees.clear();
        self.pending_actions.clear();
        self.pending_trees.push(root);
    }

    /// Like [`replace`](Self::replace) for a plan of several top-level steps; each step stays
    /// its own pending tree and is flattened only when reached.
    pub fn replace_steps<I>(&mut self, steps: I)
    where
        I: IntoIterator<Item = PlanTreeNode>,
        I::IntoIter: DoubleEndedIterator,
    {
        self.pending_trees.clear();
        self.pending_actions.clear();
        self.pending_trees.extend(steps.into_iter().rev());
    }

    pub fn clear(&mut self) {
        self.pending_trees.clear();
        self.pending_actions.clear();
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending_trees.is_empty() && self.pending_actions.is_empty()
    }

    pub fn pending_trees(&self) -> &[PlanTreeNode] {
        &self.pending_trees
    }

    /// Flattened actions, next-to-run last.
    pub fn pending_actions(&self) -> &[ActionDescriptor] {
        &self.pending_actions
    }

    pub fn push_tree(&mut self, tree: PlanTreeNode) {
        self.pending_trees.push(tree);
    }

    /// Queue `actions` ahead of everything else, keeping their relative order.
    pub fn push_front_actions<I>(&mut self, actions: I)
    where
        I: IntoIterator<Item = ActionDescriptor>,
        I::IntoIter: DoubleEndedIterator,
    {
        self.pending_actions.extend(actions.into_iter().rev());
    }

    /// Next dispatchable action.
    ///
    /// Drains flattened actions first. Otherwise flattens pending subtrees one at a time until
    /// one yields an action; `None` only once the queue is exhausted.
    pub fn pop_next<R: ChoiceRng + ?Sized>(&mut self, rng: &mut R) -> Option<ActionDescriptor> {
        loop {
            if let Some(action) = self.pending_actions.pop() {
                return Some(action);
            }

            let tree = self.pending_trees.pop()?;
            let flat = tree.flatten(rng);
            self.pending_actions.extend(flat.into_iter().rev());
        }
    }
}
