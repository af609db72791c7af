//! Demand goals: the motivational targets plans are selected for.

use ai_plan::Handle;

use crate::env::KnowledgeStore;
use crate::keys::{CURRENT_DEMAND_GOAL, DEMAND_GOAL_LIST, DEMAND_GOAL_SUFFIX, PREVIOUS_DEMAND_GOAL};
use crate::store::AtomKind;

/// Goal atom for one demand: `EvaluationLink(PredicateNode "<name>DemandGoal")`.
pub fn demand_goal(store: &mut dyn KnowledgeStore, demand: &str) -> Handle {
    let predicate = store.add_node(
        AtomKind::PredicateNode,
        &format!("{demand}{DEMAND_GOAL_SUFFIX}"),
    );
    store.add_link(AtomKind::EvaluationLink, &[predicate])
}

/// Build one goal per demand and publish the list under [`DEMAND_GOAL_LIST`].
pub fn init_demand_goal_list(store: &mut dyn KnowledgeStore, demands: &[String]) -> Vec<Handle> {
    let goals: Vec<Handle> = demands
        .iter()
        .map(|demand| demand_goal(store, demand))
        .collect();
    let list = store.add_link(AtomKind::ListLink, &goals);
    store.set_reference(DEMAND_GOAL_LIST, list);
    goals
}

pub fn current_demand_goal(store: &dyn KnowledgeStore) -> Option<Handle> {
    store.reference(CURRENT_DEMAND_GOAL)
}

pub fn previous_demand_goal(store: &dyn KnowledgeStore) -> Option<Handle> {
    store.reference(PREVIOUS_DEMAND_GOAL)
}

/// Make `goal` current; the goal it replaces becomes the previous one.
pub fn set_current_demand_goal(store: &mut dyn KnowledgeStore, goal: Handle) {
    if let Some(current) = store.reference(CURRENT_DEMAND_GOAL) {
        if current == goal {
            return;
        }
        store.set_reference(PREVIOUS_DEMAND_GOAL, current);
    }
    store.set_reference(CURRENT_DEMAND_GOAL, goal);
}
