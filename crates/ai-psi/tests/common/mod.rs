#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use ai_plan::{ActionDescriptor, Handle, PlanTreeNode, TickContext};
use ai_psi::keys::UTTERANCE_SENTENCES;
use ai_psi::{
    publish_plan, AtomKind, CognitiveCycle, CycleEnv, CycleOutcome, EngineValue, KnowledgeStore,
    LanguageComprehension, MemoryStore, Planner, ProcedureEngine, ProcedureHandle, ProcedureValue,
    PsiConfig, PsiError, PsiResult, ScriptEvaluator, TraceEvent, TraceSink, WorldSnapshot,
};

pub const AGENT: &str = "pet-1";

pub fn leaf(name: &str) -> PlanTreeNode {
    PlanTreeNode::leaf(ActionDescriptor::procedure(name))
}

pub fn config() -> PsiConfig {
    PsiConfig {
        agent_id: AGENT.to_string(),
        demands: "Energy Water".to_string(),
        procedure_execution_timeout_secs: 30,
        ..PsiConfig::default()
    }
}

/// Point the utterance store at `sentences`.
pub fn queue_sentences(store: &mut dyn KnowledgeStore, sentences: &[&str]) {
    let nodes: Vec<Handle> = sentences
        .iter()
        .map(|s| store.add_node(AtomKind::SentenceNode, s))
        .collect();
    let list = store.add_link(AtomKind::ListLink, &nodes);
    store.set_reference(UTTERANCE_SENTENCES, list);
}

pub struct FakeWorld {
    pub has_map: bool,
    pub agents: Vec<String>,
}

impl Default for FakeWorld {
    fn default() -> Self {
        Self {
            has_map: true,
            agents: vec![AGENT.to_string()],
        }
    }
}

impl WorldSnapshot for FakeWorld {
    fn has_latest_map(&self) -> bool {
        self.has_map
    }

    fn contains_agent(&self, agent_id: &str) -> bool {
        self.agents.iter().any(|a| a == agent_id)
    }
}

#[derive(Default)]
pub struct FakeEngine {
    next: u64,
    pub started: Vec<(String, Vec<ProcedureValue>)>,
    pub results: HashMap<ProcedureHandle, EngineValue>,
    pub failed: HashSet<ProcedureHandle>,
    pub stopped: Vec<ProcedureHandle>,
    pub mark_failed_calls: usize,
    pub refuse: HashSet<String>,
}

impl FakeEngine {
    pub fn last_handle(&self) -> ProcedureHandle {
        ProcedureHandle(self.next)
    }

    pub fn started_names(&self) -> Vec<&str> {
        self.started.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn finish_last(&mut self, value: EngineValue) {
        let handle = self.last_handle();
        self.results.insert(handle, value);
    }

    pub fn fail_last(&mut self) {
        let handle = self.last_handle();
        self.failed.insert(handle);
    }
}

impl ProcedureEngine for FakeEngine {
    fn run_procedure(&mut self, name: &str, args: Vec<ProcedureValue>) -> PsiResult<ProcedureHandle> {
        if self.refuse.contains(name) {
            return Err(PsiError::UnknownProcedure(name.to_string()));
        }
        self.next += 1;
        self.started.push((name.to_string(), args));
        Ok(ProcedureHandle(self.next))
    }

    fn is_finished(&self, handle: ProcedureHandle) -> bool {
        self.results.contains_key(&handle)
    }

    fn is_failed(&self, handle: ProcedureHandle) -> bool {
        self.failed.contains(&handle)
    }

    fn result(&self, handle: ProcedureHandle) -> EngineValue {
        self.results
            .get(&handle)
            .cloned()
            .unwrap_or_else(|| EngineValue::Other("null".to_string()))
    }

    fn stop_procedure(&mut self, handle: ProcedureHandle) {
        self.stopped.push(handle);
    }

    fn mark_pending_action_plans_failed(&mut self) {
        self.mark_failed_calls += 1;
    }
}

type EvalHook = Box<dyn FnMut(&str, &mut dyn KnowledgeStore)>;

#[derive(Default)]
pub struct RecordingEvaluator {
    pub expressions: Vec<String>,
    pub fail_on: Option<String>,
    pub hook: Option<EvalHook>,
}

impl ScriptEvaluator for RecordingEvaluator {
    fn eval(&mut self, expression: &str, store: &mut dyn KnowledgeStore) -> PsiResult<String> {
        self.expressions.push(expression.to_string());
        if let Some(hook) = self.hook.as_mut() {
            hook(expression, store);
        }
        if self.fail_on.as_deref() == Some(expression) {
            return Err(PsiError::Eval {
                expression: expression.to_string(),
                reason: "unbound variable".to_string(),
            });
        }
        Ok(String::new())
    }
}

#[derive(Default)]
pub struct FakeLanguage {
    pub resolved: usize,
    pub answered: usize,
}

impl LanguageComprehension for FakeLanguage {
    fn resolve_latest_sentence_reference(&mut self, _store: &mut dyn KnowledgeStore) -> PsiResult<()> {
        self.resolved += 1;
        Ok(())
    }

    fn answer_question(&mut self, store: &mut dyn KnowledgeStore) -> PsiResult<()> {
        self.answered += 1;
        queue_sentences(store, &["TO: bob, CONTENT: forty two"]);
        Ok(())
    }
}

/// What the fake planner deposits on each call.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub demand: String,
    pub steps: Vec<PlanTreeNode>,
    pub confidence: f64,
}

impl PlanDraft {
    pub fn new(demand: &str, steps: Vec<PlanTreeNode>) -> Self {
        Self {
            demand: demand.to_string(),
            steps,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

#[derive(Default)]
pub struct FakePlanner {
    pub calls: usize,
    pub fail: bool,
    pub draft: Option<PlanDraft>,
}

impl Planner for FakePlanner {
    fn plan(&mut self, store: &mut dyn KnowledgeStore) -> PsiResult<()> {
        self.calls += 1;
        if self.fail {
            return Err(PsiError::Planner("do_planning raised".to_string()));
        }
        if let Some(draft) = &self.draft {
            let goal = ai_psi::demand::demand_goal(store, &draft.demand);
            let rule = store.add_node(AtomKind::ConceptNode, &format!("{}_rule", draft.demand));
            let context = store.add_node(AtomKind::ConceptNode, &format!("{}_context", draft.demand));
            publish_plan(store, goal, &[rule], &[context], &draft.steps, draft.confidence);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RcSink(pub Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

pub struct Harness {
    pub world: FakeWorld,
    pub store: MemoryStore,
    pub planner: FakePlanner,
    pub engine: FakeEngine,
    pub evaluator: RecordingEvaluator,
    pub language: FakeLanguage,
    pub cycle: CognitiveCycle,
    pub events: Rc<RefCell<Vec<TraceEvent>>>,
    pub now: u64,
    pub tick_index: u64,
}

impl Harness {
    pub fn new(config: PsiConfig) -> Self {
        let sink = RcSink::default();
        let events = sink.0.clone();
        Self {
            world: FakeWorld::default(),
            store: MemoryStore::new(),
            planner: FakePlanner::default(),
            engine: FakeEngine::default(),
            evaluator: RecordingEvaluator::default(),
            language: FakeLanguage::default(),
            cycle: CognitiveCycle::new(config).with_trace_sink(Box::new(sink)),
            events,
            now: 1_000,
            tick_index: 0,
        }
    }

    pub fn with_plan(config: PsiConfig, draft: PlanDraft) -> Self {
        let mut harness = Self::new(config);
        harness.planner.draft = Some(draft);
        harness
    }

    pub fn tick(&mut self) -> CycleOutcome {
        self.tick_index += 1;
        let ctx = TickContext::new(self.tick_index, self.now, 7);
        let mut env = CycleEnv {
            world: &self.world,
            store: &mut self.store,
            planner: &mut self.planner,
            engine: &mut self.engine,
            evaluator: &mut self.evaluator,
            language: &mut self.language,
        };
        self.cycle.tick(&ctx, &mut env)
    }

    /// Tick through the replanning delay up to the first dispatch.
    pub fn tick_until_dispatch(&mut self, max_ticks: usize) -> ActionDescriptor {
        for _ in 0..max_ticks {
            if let CycleOutcome::Dispatched(action) = self.tick() {
                return action;
            }
        }
        panic!("nothing dispatched within {max_ticks} ticks");
    }

    pub fn tags(&self) -> Vec<String> {
        self.events.borrow().iter().map(|e| e.tag.to_string()).collect()
    }
}
