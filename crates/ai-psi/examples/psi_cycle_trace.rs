use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ai_plan::{ActionDescriptor, Argument, PlanTreeNode, TickContext};
use ai_psi::{
    demand, publish_plan, ActionResultTag, AtomKind, CognitiveCycle, CycleEnv, EngineValue,
    KnowledgeStore, LanguageComprehension, MemoryStore, Planner, ProcedureEngine, ProcedureHandle,
    ProcedureValue, PsiConfig, PsiError, PsiResult, ScriptEvaluator, TraceEvent, TraceSink, VecTraceSink,
    WorldSnapshot,
};
use tracing_subscriber::{fmt, EnvFilter};

struct World;

impl WorldSnapshot for World {
    fn has_latest_map(&self) -> bool {
        true
    }

    fn contains_agent(&self, agent_id: &str) -> bool {
        agent_id == "pet"
    }
}

const KNOWN_PROCEDURES: &[&str] = &["goto_obj", "eat"];

/// Every known procedure takes two seconds and succeeds.
#[derive(Default)]
struct Engine {
    next: u64,
    now: u64,
    started: HashMap<ProcedureHandle, u64>,
}

impl ProcedureEngine for Engine {
    fn run_procedure(&mut self, name: &str, args: Vec<ProcedureValue>) -> PsiResult<ProcedureHandle> {
        if !KNOWN_PROCEDURES.contains(&name) {
            return Err(PsiError::Procedure {
                name: name.to_string(),
                reason: "no such schema loaded".to_string(),
            });
        }
        self.next += 1;
        let handle = ProcedureHandle(self.next);
        println!("  engine: run {name} {args:?} as {handle}");
        self.started.insert(handle, self.now);
        Ok(handle)
    }

    fn is_finished(&self, handle: ProcedureHandle) -> bool {
        self.started
            .get(&handle)
            .is_some_and(|&at| self.now >= at + 2)
    }

    fn is_failed(&self, _handle: ProcedureHandle) -> bool {
        false
    }

    fn result(&self, _handle: ProcedureHandle) -> EngineValue {
        EngineValue::ActionResult(ActionResultTag::Success)
    }

    fn stop_procedure(&mut self, handle: ProcedureHandle) {
        self.started.remove(&handle);
    }

    fn mark_pending_action_plans_failed(&mut self) {}
}

struct Evaluator;

impl ScriptEvaluator for Evaluator {
    fn eval(&mut self, expression: &str, _store: &mut dyn KnowledgeStore) -> PsiResult<String> {
        println!("  eval: {expression}");
        Ok(String::new())
    }
}

struct Language;

impl LanguageComprehension for Language {
    fn resolve_latest_sentence_reference(&mut self, _store: &mut dyn KnowledgeStore) -> PsiResult<()> {
        Ok(())
    }

    fn answer_question(&mut self, _store: &mut dyn KnowledgeStore) -> PsiResult<()> {
        Ok(())
    }
}

/// Alternates between feeding and socialising.
#[derive(Default)]
struct DemoPlanner {
    calls: usize,
}

impl Planner for DemoPlanner {
    fn plan(&mut self, store: &mut dyn KnowledgeStore) -> PsiResult<()> {
        self.calls += 1;
        let (demand_name, steps) = if self.calls % 2 == 1 {
            let goto = ActionDescriptor::procedure("goto_obj")
                .with_arguments([Argument::text("food_bowl"), Argument::Number(1.5)]);
            (
                "Energy",
                vec![
                    PlanTreeNode::leaf(goto),
                    PlanTreeNode::alternative([
                        PlanTreeNode::leaf(ActionDescriptor::procedure("eat")),
                        PlanTreeNode::leaf(ActionDescriptor::procedure("sniff")),
                    ]),
                ],
            )
        } else {
            (
                "Affiliation",
                vec![
                    PlanTreeNode::leaf(ActionDescriptor::speech_act("greet")),
                    PlanTreeNode::leaf(ActionDescriptor::scripted("wag_tail")),
                ],
            )
        };

        let goal = demand::demand_goal(store, demand_name);
        let rule = store.add_node(AtomKind::ConceptNode, &format!("{demand_name}Rule"));
        publish_plan(store, goal, &[rule], &[], &steps, 0.95);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedSink(Rc<RefCell<VecTraceSink>>);

impl TraceSink for SharedSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().emit(event);
    }
}

fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = PsiConfig {
        agent_id: "pet".to_string(),
        demands: "Energy Affiliation".to_string(),
        replan_delay_cycles: 2,
        ..PsiConfig::default()
    };

    let sink = SharedSink::default();
    let mut cycle = CognitiveCycle::new(config).with_trace_sink(Box::new(sink.clone()));

    let world = World;
    let mut store = MemoryStore::new();
    let mut planner = DemoPlanner::default();
    let mut engine = Engine::default();
    let mut evaluator = Evaluator;
    let mut language = Language;

    for tick in 1..=20u64 {
        engine.now = tick;
        let ctx = TickContext::new(tick, tick, 0);
        let mut env = CycleEnv {
            world: &world,
            store: &mut store,
            planner: &mut planner,
            engine: &mut engine,
            evaluator: &mut evaluator,
            language: &mut language,
        };
        let outcome = cycle.tick(&ctx, &mut env);
        println!("[tick={tick}] {outcome:?}");
    }

    println!();
    for e in &sink.0.borrow().events {
        println!("[cycle={}] {} {}", e.cycle, e.tag, e.detail);
    }
}
