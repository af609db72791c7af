mod common;

use ai_plan::{ActionDescriptor, ActionKind, Argument, Handle, PlanTreeNode};
use ai_psi::keys::{PLAN_ACTION_LIST, PLAN_SELECTED_DEMAND_GOAL};
use ai_psi::plan_cache::{decode_action, decode_tree, plan_success_confidence};
use ai_psi::{publish_plan, AtomKind, KnowledgeStore, MemoryStore, PlanCache};
use common::leaf;

fn publish(store: &mut MemoryStore, steps: &[PlanTreeNode], confidence: f64) -> Handle {
    let goal = ai_psi::demand::demand_goal(store, "Energy");
    let rule = store.add_node(AtomKind::ConceptNode, "rule");
    publish_plan(store, goal, &[rule], &[], steps, confidence);
    goal
}

#[test]
fn no_flag_means_no_plan() {
    let store = MemoryStore::new();
    assert_eq!(plan_success_confidence(&store), 0.0);
    assert!(PlanCache::new(0.9).get_plan(&store).is_none());
}

#[test]
fn multi_step_plans_decode_as_a_sequence() {
    let mut store = MemoryStore::new();
    let steps = [
        leaf("goto_food"),
        PlanTreeNode::alternative([leaf("eat"), leaf("drink")]),
    ];
    let goal = publish(&mut store, &steps, 0.95);

    let plan = PlanCache::new(0.9).get_plan(&store).expect("plan");
    assert_eq!(plan.selected_goal, goal);
    assert_eq!(plan.rule_refs.len(), 1);
    assert!(plan.context_refs.is_empty());
    assert_eq!(plan.action_refs.len(), 2);
    assert_eq!(plan.action_tree, PlanTreeNode::sequence(steps));
}

#[test]
fn single_step_plan_keeps_its_root() {
    let mut store = MemoryStore::new();
    let root = PlanTreeNode::alternative([leaf("eat"), leaf("drink")]);
    publish(&mut store, std::slice::from_ref(&root), 1.0);

    let plan = PlanCache::new(0.9).get_plan(&store).expect("plan");
    assert_eq!(plan.action_tree, root);
}

#[test]
fn reading_a_plan_leaves_the_store_unchanged() {
    let mut store = MemoryStore::new();
    publish(&mut store, &[leaf("eat")], 1.0);
    let atoms = store.len();

    let cache = PlanCache::new(0.9);
    assert!(cache.get_plan(&store).is_some());
    assert!(cache.get_plan(&store).is_some());
    assert_eq!(store.len(), atoms);
    assert!(cache.queue().is_exhausted());
}

#[test]
fn confident_flag_without_references_is_an_error() {
    let mut store = MemoryStore::new();
    let predicate = store.add_node(AtomKind::PredicateNode, ai_psi::keys::PLAN_SUCCESS);
    let empty = store.add_list(&[]);
    let flag = store.add_link(AtomKind::EvaluationLink, &[predicate, empty]);
    store.set_truth_mean(flag, 1.0);

    let cache = PlanCache::new(0.9);
    let err = cache.read_plan(&store).unwrap_err();
    assert!(err.to_string().contains(PLAN_SELECTED_DEMAND_GOAL));
    assert!(cache.get_plan(&store).is_none());
}

#[test]
fn action_kinds_follow_schema_naming() {
    let mut store = MemoryStore::new();

    let scripted = store.add_node(AtomKind::GroundedSchemaNode, "scm: answer_question");
    let no_args = store.add_list(&[]);
    let link = store.add_link(AtomKind::ExecutionLink, &[scripted, no_args]);
    let action = decode_action(&store, link).expect("action");
    assert_eq!(action.kind, ActionKind::ScriptedFunction);
    assert_eq!(action.name, "answer_question");

    let speech = store.add_node(AtomKind::SpeechActSchemaNode, "greet");
    let link = store.add_link(AtomKind::ExecutionLink, &[speech, no_args]);
    assert_eq!(decode_action(&store, link), Some(ActionDescriptor::speech_act("greet")));

    let schema = store.add_node(AtomKind::GroundedSchemaNode, "goto_obj");
    let target = store.add_node(AtomKind::ObjectNode, "ball_7");
    let speed = store.add_node(AtomKind::NumberNode, "1.5");
    let odd = store.add_node(AtomKind::NumberNode, "fast");
    let args = store.add_list(&[target, speed, odd]);
    let link = store.add_link(AtomKind::ExecutionLink, &[schema, args]);
    assert_eq!(
        decode_action(&store, link),
        Some(ActionDescriptor::procedure("goto_obj").with_arguments([
            Argument::text("ball_7"),
            Argument::Number(1.5),
            Argument::text("fast"),
        ]))
    );
}

#[test]
fn unknown_links_stay_opaque() {
    let mut store = MemoryStore::new();
    let schema = store.add_node(AtomKind::GroundedSchemaNode, "eat");
    let args = store.add_list(&[]);
    let exec = store.add_link(AtomKind::ExecutionLink, &[schema, args]);
    let implication = store.add_link(AtomKind::ImplicationLink, &[exec]);
    let and = store.add_link(AtomKind::AndLink, &[implication, exec]);

    let tree = decode_tree(&store, and);
    match &tree {
        PlanTreeNode::Sequence(children) => {
            assert!(matches!(
                &children[0],
                PlanTreeNode::Unknown { kind, children } if kind == "ImplicationLink" && children.len() == 1
            ));
            assert_eq!(children[1], leaf("eat"));
        }
        other => panic!("expected sequence, got {other}"),
    }
    assert_eq!(tree.leaf_count(), 2);
}

#[test]
fn published_action_list_is_referenced() {
    let mut store = MemoryStore::new();
    publish(&mut store, &[leaf("eat"), leaf("sleep")], 1.0);
    let list = store.reference(PLAN_ACTION_LIST).expect("action list");
    assert_eq!(store.arity(list), 2);
}
