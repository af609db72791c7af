//! Collaborator interfaces consumed by the cycle.
//!
//! The cycle owns none of these. The host hands them over for the duration of one tick as a
//! [`CycleEnv`].

use core::fmt;

use ai_plan::Handle;

use crate::error::PsiResult;
use crate::store::AtomKind;

/// Narrow view of the shared knowledge graph.
///
/// `add_node`/`add_link` are upserts: asking twice for the same atom returns the same handle.
pub trait KnowledgeStore {
    fn add_node(&mut self, kind: AtomKind, name: &str) -> Handle;
    fn add_link(&mut self, kind: AtomKind, outgoing: &[Handle]) -> Handle;

    fn find_node(&self, kind: AtomKind, name: &str) -> Option<Handle>;
    fn find_link(&self, kind: AtomKind, outgoing: &[Handle]) -> Option<Handle>;

    fn kind(&self, handle: Handle) -> Option<AtomKind>;
    fn name(&self, handle: Handle) -> Option<&str>;
    fn outgoing(&self, handle: Handle) -> &[Handle];

    fn arity(&self, handle: Handle) -> usize {
        self.outgoing(handle).len()
    }

    /// Confidence of a boolean-flag atom; unknown atoms read as 0.
    fn truth_mean(&self, handle: Handle) -> f64;
    fn set_truth_mean(&mut self, handle: Handle, mean: f64);

    /// Fixed-weight salience boost.
    fn stimulate(&mut self, handle: Handle, amount: i32);

    /// Target of the reference registered under `key`.
    fn reference(&self, key: &str) -> Option<Handle>;
    /// Register `target` under `key`, replacing any previous reference.
    fn set_reference(&mut self, key: &str, target: Handle);
}

/// The external planner. Its result is observed only through the store.
pub trait Planner {
    fn plan(&mut self, store: &mut dyn KnowledgeStore) -> PsiResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcedureHandle(pub u64);

impl fmt::Display for ProcedureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema#{}", self.0)
    }
}

/// Argument in the procedure engine's native value types.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcedureValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResultTag {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinValue {
    LogicalTrue,
    LogicalFalse,
}

/// Raw value a finished procedure reports.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineValue {
    ActionResult(ActionResultTag),
    Builtin(BuiltinValue),
    Other(String),
}

impl fmt::Display for EngineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineValue::ActionResult(ActionResultTag::Success) => f.write_str("action_success"),
            EngineValue::ActionResult(ActionResultTag::Failure) => f.write_str("action_failure"),
            EngineValue::Builtin(BuiltinValue::LogicalTrue) => f.write_str("true"),
            EngineValue::Builtin(BuiltinValue::LogicalFalse) => f.write_str("false"),
            EngineValue::Other(raw) => f.write_str(raw),
        }
    }
}

/// Asynchronous procedure runner. Completion is observed by polling.
pub trait ProcedureEngine {
    fn run_procedure(&mut self, name: &str, args: Vec<ProcedureValue>) -> PsiResult<ProcedureHandle>;
    fn is_finished(&self, handle: ProcedureHandle) -> bool;
    fn is_failed(&self, handle: ProcedureHandle) -> bool;
    fn result(&self, handle: ProcedureHandle) -> EngineValue;
    fn stop_procedure(&mut self, handle: ProcedureHandle);
    /// Record every pending action plan as failed (used when an action times out).
    fn mark_pending_action_plans_failed(&mut self);
}

pub trait ScriptEvaluator {
    fn eval(&mut self, expression: &str, store: &mut dyn KnowledgeStore) -> PsiResult<String>;
}

pub trait LanguageComprehension {
    fn resolve_latest_sentence_reference(&mut self, store: &mut dyn KnowledgeStore) -> PsiResult<()>;
    fn answer_question(&mut self, store: &mut dyn KnowledgeStore) -> PsiResult<()>;
}

/// Latest spatial snapshot of the world.
pub trait WorldSnapshot {
    fn has_latest_map(&self) -> bool;
    fn contains_agent(&self, agent_id: &str) -> bool;
}

/// Collaborators lent to the cycle for one tick.
pub struct CycleEnv<'a> {
    pub world: &'a dyn WorldSnapshot,
    pub store: &'a mut dyn KnowledgeStore,
    pub planner: &'a mut dyn Planner,
    pub engine: &'a mut dyn ProcedureEngine,
    pub evaluator: &'a mut dyn ScriptEvaluator,
    pub language: &'a mut dyn LanguageComprehension,
}
