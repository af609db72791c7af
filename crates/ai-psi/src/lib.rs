//! Psi action selection: the per-tick decision-and-execution loop of an embodied agent.
//!
//! Each cycle the [`CognitiveCycle`] either waits on the action in flight, pulls the next action
//! from the cached plan, or asks the planner for a new one. It never blocks: every wait is a
//! return to the host scheduler and a re-check on the next tick.

#![forbid(unsafe_code)]

pub mod config;
pub mod cycle;
pub mod demand;
pub mod dispatcher;
pub mod env;
pub mod error;
pub mod keys;
pub mod plan_cache;
pub mod store;
pub mod trace;
pub mod tracker;

pub use config::PsiConfig;
pub use cycle::{CognitiveCycle, CycleOutcome};
pub use dispatcher::{parse_utterance, ActionDispatcher};
pub use env::{
    ActionResultTag, BuiltinValue, CycleEnv, EngineValue, KnowledgeStore, LanguageComprehension,
    Planner, ProcedureEngine, ProcedureHandle, ProcedureValue, ScriptEvaluator, WorldSnapshot,
};
pub use error::{PsiError, PsiResult};
pub use plan_cache::{publish_plan, PlanCache};
pub use store::{AtomKind, MemoryStore};
pub use trace::{NullTraceSink, TraceEvent, TraceSink, VecTraceSink};
pub use tracker::{ActionLifecycleTracker, InFlightAction, Resolution, ResultDecode};
