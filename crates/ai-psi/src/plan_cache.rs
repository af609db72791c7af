//! Plan retrieval from the knowledge store and the cached residual queue.

use ai_plan::{ActionDescriptor, ActionKind, Argument, Handle, Plan, PlanTreeNode, ResidualQueue};

use crate::env::KnowledgeStore;
use crate::error::{PsiError, PsiResult};
use crate::keys::{
    PLAN_ACTION_LIST, PLAN_CONTEXT_LIST, PLAN_RULE_LIST, PLAN_SELECTED_DEMAND_GOAL, PLAN_SUCCESS,
    SCRIPTED_PREFIX,
};
use crate::store::AtomKind;

/// Deeper graphs than this decode as `Unknown` (guards against cyclic plans).
const MAX_DECODE_DEPTH: usize = 64;

/// Latest adopted plan plus what is left of it.
#[derive(Debug, Clone)]
pub struct PlanCache {
    threshold: f64,
    plan: Option<Plan>,
    queue: ResidualQueue,
}

impl PlanCache {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            plan: None,
            queue: ResidualQueue::new(),
        }
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn queue(&self) -> &ResidualQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut ResidualQueue {
        &mut self.queue
    }

    /// Drop the unexecuted remainder of the current plan.
    pub fn discard_residue(&mut self) {
        self.queue.clear();
    }

    /// Make `plan` current: its steps replace the residual queue wholesale.
    ///
    /// Each top-level step becomes its own pending tree, so alternatives in later steps are
    /// resolved only when execution reaches them.
    pub fn adopt(&mut self, plan: Plan) {
        match &plan.action_tree {
            PlanTreeNode::Sequence(steps) if plan.action_refs.len() > 1 => {
                self.queue.replace_steps(steps.iter().cloned());
            }
            root => self.queue.replace(root.clone()),
        }
        self.plan = Some(plan);
    }

    /// Read the planner's latest result. Never mutates the store or the cache.
    pub fn get_plan(&self, store: &dyn KnowledgeStore) -> Option<Plan> {
        match self.read_plan(store) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(error = %err, "Plan reported successful but could not be read");
                None
            }
        }
    }

    /// `Ok(None)` when the planner did not report success with enough confidence.
    pub fn read_plan(&self, store: &dyn KnowledgeStore) -> PsiResult<Option<Plan>> {
        let confidence = plan_success_confidence(store);
        if confidence <= self.threshold {
            tracing::debug!(confidence, threshold = self.threshold, "No confident plan available");
            return Ok(None);
        }

        let selected_goal = require_reference(store, PLAN_SELECTED_DEMAND_GOAL)?;
        let rule_refs = store.outgoing(require_reference(store, PLAN_RULE_LIST)?).to_vec();
        let context_refs = store.outgoing(require_reference(store, PLAN_CONTEXT_LIST)?).to_vec();
        let action_refs = store.outgoing(require_reference(store, PLAN_ACTION_LIST)?).to_vec();

        let mut steps: Vec<PlanTreeNode> = action_refs
            .iter()
            .map(|&step| decode_tree(store, step))
            .collect();
        let action_tree = if steps.len() == 1 {
            steps.remove(0)
        } else {
            PlanTreeNode::Sequence(steps)
        };

        Ok(Some(Plan {
            selected_goal,
            rule_refs,
            context_refs,
            action_refs,
            action_tree,
        }))
    }
}

fn require_reference(store: &dyn KnowledgeStore, key: &str) -> PsiResult<Handle> {
    store
        .reference(key)
        .ok_or_else(|| PsiError::MissingReference(key.to_string()))
}

/// Truth mean of `EvaluationLink(PredicateNode "plan_success", ListLink())`, 0 when absent.
pub fn plan_success_confidence(store: &dyn KnowledgeStore) -> f64 {
    let flag = store
        .find_node(AtomKind::PredicateNode, PLAN_SUCCESS)
        .zip(store.find_link(AtomKind::ListLink, &[]))
        .and_then(|(predicate, empty)| {
            store.find_link(AtomKind::EvaluationLink, &[predicate, empty])
        });
    flag.map(|h| store.truth_mean(h)).unwrap_or(0.0)
}

/// Decode one action step of a stored plan.
pub fn decode_tree(store: &dyn KnowledgeStore, handle: Handle) -> PlanTreeNode {
    decode_at(store, handle, 0)
}

fn decode_at(store: &dyn KnowledgeStore, handle: Handle, depth: usize) -> PlanTreeNode {
    let Some(kind) = store.kind(handle) else {
        return PlanTreeNode::Unknown {
            kind: "undefined".to_string(),
            children: Vec::new(),
        };
    };

    if depth >= MAX_DECODE_DEPTH {
        return PlanTreeNode::Unknown {
            kind: kind.name().to_string(),
            children: Vec::new(),
        };
    }

    let children = |store: &dyn KnowledgeStore| -> Vec<PlanTreeNode> {
        store
            .outgoing(handle)
            .iter()
            .map(|&child| decode_at(store, child, depth + 1))
            .collect()
    };

    match kind {
        AtomKind::ExecutionLink => match decode_action(store, handle) {
            Some(action) => PlanTreeNode::Leaf(action),
            None => PlanTreeNode::Unknown {
                kind: kind.name().to_string(),
                children: Vec::new(),
            },
        },
        AtomKind::AndLink | AtomKind::SequentialAndLink => PlanTreeNode::Sequence(children(store)),
        AtomKind::OrLink => PlanTreeNode::Alternative(children(store)),
        other => PlanTreeNode::Unknown {
            kind: other.name().to_string(),
            children: children(store),
        },
    }
}

/// `ExecutionLink(schema, ListLink(args...))` → descriptor.
///
/// Speech-act schema nodes become speech acts, names carrying the `scm:` prefix become scripted
/// functions (prefix stripped), everything else is a procedure call.
pub fn decode_action(store: &dyn KnowledgeStore, execution_link: Handle) -> Option<ActionDescriptor> {
    let outgoing = store.outgoing(execution_link);
    let schema = *outgoing.first()?;
    let schema_name = store.name(schema)?;

    let (kind, name) = if store.kind(schema) == Some(AtomKind::SpeechActSchemaNode) {
        (ActionKind::SpeechAct, schema_name.trim().to_string())
    } else if let Some(index) = schema_name.find(SCRIPTED_PREFIX) {
        let name = schema_name[index + SCRIPTED_PREFIX.len()..].trim();
        (ActionKind::ScriptedFunction, name.to_string())
    } else {
        (ActionKind::ProcedureCall, schema_name.to_string())
    };

    let mut action = ActionDescriptor::new(kind, name);
    if outgoing.len() == 2 {
        for &arg in store.outgoing(outgoing[1]) {
            let text = store.name(arg).unwrap_or_default();
            let argument = match store.kind(arg) {
                Some(AtomKind::NumberNode) => text
                    .trim()
                    .parse::<f64>()
                    .map(Argument::Number)
                    .unwrap_or_else(|_| Argument::text(text)),
                _ => Argument::text(text),
            };
            action.arguments.push(argument);
        }
    }
    Some(action)
}

/// Store `tree` as graph atoms; inverse of [`decode_tree`].
///
/// `Unknown` nodes are written as `ImplicationLink`s so they stay opaque to the decoder.
pub fn encode_tree(store: &mut dyn KnowledgeStore, tree: &PlanTreeNode) -> Handle {
    match tree {
        PlanTreeNode::Leaf(action) => encode_action(store, action),
        PlanTreeNode::Sequence(children) => {
            let outgoing = encode_all(store, children);
            store.add_link(AtomKind::SequentialAndLink, &outgoing)
        }
        PlanTreeNode::Alternative(children) => {
            let outgoing = encode_all(store, children);
            store.add_link(AtomKind::OrLink, &outgoing)
        }
        PlanTreeNode::Unknown { children, .. } => {
            let outgoing = encode_all(store, children);
            store.add_link(AtomKind::ImplicationLink, &outgoing)
        }
    }
}

fn encode_all(store: &mut dyn KnowledgeStore, children: &[PlanTreeNode]) -> Vec<Handle> {
    children.iter().map(|c| encode_tree(store, c)).collect()
}

fn encode_action(store: &mut dyn KnowledgeStore, action: &ActionDescriptor) -> Handle {
    let schema = match action.kind {
        ActionKind::SpeechAct => store.add_node(AtomKind::SpeechActSchemaNode, &action.name),
        ActionKind::ScriptedFunction => store.add_node(
            AtomKind::GroundedSchemaNode,
            &format!("{SCRIPTED_PREFIX} {}", action.name),
        ),
        ActionKind::ProcedureCall => store.add_node(AtomKind::GroundedSchemaNode, &action.name),
    };
    let args: Vec<Handle> = action
        .arguments
        .iter()
        .map(|arg| match arg {
            Argument::Number(n) => store.add_node(AtomKind::NumberNode, &n.to_string()),
            Argument::Text(s) => store.add_node(AtomKind::ConceptNode, s),
        })
        .collect();
    let list = store.add_link(AtomKind::ListLink, &args);
    store.add_link(AtomKind::ExecutionLink, &[schema, list])
}

/// Write a planning result where [`PlanCache::get_plan`] looks for it.
///
/// Planner implementations call this; `confidence` becomes the plan-success truth mean.
pub fn publish_plan(
    store: &mut dyn KnowledgeStore,
    goal: Handle,
    rules: &[Handle],
    contexts: &[Handle],
    steps: &[PlanTreeNode],
    confidence: f64,
) {
    let predicate = store.add_node(AtomKind::PredicateNode, PLAN_SUCCESS);
    let empty = store.add_link(AtomKind::ListLink, &[]);
    let flag = store.add_link(AtomKind::EvaluationLink, &[predicate, empty]);
    store.set_truth_mean(flag, confidence);

    store.set_reference(PLAN_SELECTED_DEMAND_GOAL, goal);
    let rule_list = store.add_link(AtomKind::ListLink, rules);
    store.set_reference(PLAN_RULE_LIST, rule_list);
    let context_list = store.add_link(AtomKind::ListLink, contexts);
    store.set_reference(PLAN_CONTEXT_LIST, context_list);

    let step_handles = encode_all(store, steps);
    let action_list = store.add_link(AtomKind::ListLink, &step_handles);
    store.set_reference(PLAN_ACTION_LIST, action_list);
}
