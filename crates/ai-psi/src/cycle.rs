//! The per-tick cognitive cycle.

use ai_plan::{ActionDescriptor, Handle, Plan, ResidualQueue, TickContext};

use crate::config::PsiConfig;
use crate::demand;
use crate::dispatcher::ActionDispatcher;
use crate::env::CycleEnv;
use crate::plan_cache::PlanCache;
use crate::trace::{NullTraceSink, TraceEvent, TraceSink};
use crate::tracker::{ActionLifecycleTracker, InFlightAction, Resolution, ResultDecode};

/// RNG stream used when a plan subtree is flattened.
const FLATTEN_STREAM: u64 = 0x7073_695F_666C_6174;

/// What one call to [`CognitiveCycle::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No world map yet.
    SkippedNoMap,
    /// The agent is not in the world map yet.
    SkippedAgentMissing,
    /// The in-flight action has not resolved; nothing else was done.
    StillRunning,
    /// Plan exhausted; planning is attempted `remaining` cycles from now.
    Throttled { remaining: u32 },
    /// The planner call itself failed.
    PlanningFailed,
    /// The planner ran but left no confident plan.
    NoPlan,
    /// Plan available but nothing dispatchable came out of it this cycle.
    NoAction,
    Dispatched(ActionDescriptor),
    /// The procedure engine refused the action.
    DispatchFailed(ActionDescriptor),
}

/// Decision-and-execution loop state, held across ticks.
///
/// One call to [`tick`](Self::tick) per host scheduling tick. Exactly one action may be in
/// flight; while it is, the cycle only polls it.
pub struct CognitiveCycle {
    config: PsiConfig,
    initialized: bool,
    demand_goals: Vec<Handle>,
    tracker: ActionLifecycleTracker,
    dispatcher: ActionDispatcher,
    cache: PlanCache,
    current_goal: Option<Handle>,
    current_action: Option<ActionDescriptor>,
    exhausted_cycles: u32,
    planner_calls: u64,
    plans_adopted: u64,
    trace: Box<dyn TraceSink>,
}

impl CognitiveCycle {
    pub fn new(config: PsiConfig) -> Self {
        Self {
            tracker: ActionLifecycleTracker::new(config.procedure_execution_timeout_secs),
            cache: PlanCache::new(config.plan_success_threshold),
            config,
            initialized: false,
            demand_goals: Vec::new(),
            dispatcher: ActionDispatcher::new(),
            current_goal: None,
            current_action: None,
            exhausted_cycles: 0,
            planner_calls: 0,
            plans_adopted: 0,
            trace: Box::new(NullTraceSink),
        }
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = sink;
        self
    }

    pub fn config(&self) -> &PsiConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn demand_goals(&self) -> &[Handle] {
        &self.demand_goals
    }

    /// Goal of the most recently adopted plan.
    pub fn current_goal(&self) -> Option<Handle> {
        self.current_goal
    }

    /// Last action popped for dispatch.
    pub fn current_action(&self) -> Option<&ActionDescriptor> {
        self.current_action.as_ref()
    }

    pub fn in_flight(&self) -> Option<&InFlightAction> {
        self.tracker.in_flight()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.cache.plan()
    }

    pub fn residual(&self) -> &ResidualQueue {
        self.cache.queue()
    }

    /// Times the planner was invoked.
    pub fn planner_calls(&self) -> u64 {
        self.planner_calls
    }

    pub fn plans_adopted(&self) -> u64 {
        self.plans_adopted
    }

    pub fn tick(&mut self, ctx: &TickContext, env: &mut CycleEnv<'_>) -> CycleOutcome {
        if !env.world.has_latest_map() {
            tracing::warn!(cycle = ctx.cycle, "There is no map info available yet");
            self.emit(ctx, "psi.skip.no_map", "");
            return CycleOutcome::SkippedNoMap;
        }

        if !env.world.contains_agent(&self.config.agent_id) {
            tracing::warn!(
                cycle = ctx.cycle,
                agent = %self.config.agent_id,
                "Agent was not inserted in the space map yet"
            );
            self.emit(ctx, "psi.skip.agent_missing", "");
            return CycleOutcome::SkippedAgentMissing;
        }

        if !self.initialized {
            self.init(ctx, env);
        }

        if self.tracker.is_dispatched() {
            let resolution = self.tracker.poll(&mut *env.engine, ctx.now_secs, ctx.cycle);
            match &resolution {
                Resolution::Idle => {}
                Resolution::Running => return CycleOutcome::StillRunning,
                _ if resolution.is_succeeded() => self.emit(ctx, "psi.action.success", ""),
                Resolution::Completed(ResultDecode::Unrecognized(raw)) => {
                    let raw = raw.clone();
                    self.emit(ctx, "psi.action.unexpected", raw);
                }
                Resolution::Completed(_) => self.emit(ctx, "psi.action.failure", ""),
                Resolution::Failed => self.emit(ctx, "psi.action.failed", ""),
                Resolution::TimedOut => self.emit(ctx, "psi.action.timeout", ""),
            }

            if resolution.cancels_sequence() {
                self.cache.discard_residue();
                self.emit(ctx, "psi.plan.discarded", "");
            }
        }

        if self.cache.queue().is_exhausted() {
            if let Some(outcome) = self.replan(ctx, env) {
                return outcome;
            }
        }

        let mut rng = ctx.rng(FLATTEN_STREAM);
        let Some(action) = self.cache.queue_mut().pop_next(&mut rng) else {
            tracing::debug!(
                cycle = ctx.cycle,
                "Failed to get any actions from the planner, trying again next cycle"
            );
            self.emit(ctx, "psi.action.none", "");
            return CycleOutcome::NoAction;
        };
        self.current_action = Some(action.clone());

        match self
            .dispatcher
            .dispatch(&action, env, self.cache.queue_mut(), ctx.cycle)
        {
            Ok(Some(handle)) => {
                if let Err(err) = self.tracker.begin(action.clone(), handle, ctx.now_secs) {
                    tracing::error!(cycle = ctx.cycle, error = %err, "Dispatched over an action in flight");
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(cycle = ctx.cycle, action = %action, error = %err, "Failed to dispatch action");
                self.emit(ctx, "psi.action.dispatch_error", action.name.clone());
                return CycleOutcome::DispatchFailed(action);
            }
        }

        self.emit(ctx, "psi.action.dispatched", action.name.clone());
        CycleOutcome::Dispatched(action)
    }

    fn init(&mut self, ctx: &TickContext, env: &mut CycleEnv<'_>) {
        tracing::debug!(cycle = ctx.cycle, "Initializing action selection");

        let demands = self.config.demand_names();
        self.demand_goals = demand::init_demand_goal_list(&mut *env.store, &demands);
        self.tracker
            .set_timeout_secs(self.config.procedure_execution_timeout_secs);
        self.initialized = true;

        tracing::debug!(
            cycle = ctx.cycle,
            demands = ?demands,
            "Added the list of demand goals"
        );
        self.emit(ctx, "psi.init", demands.join(" "));
    }

    /// `Some(outcome)` when the tick must end here; `None` once a new plan is in the queue.
    fn replan(&mut self, ctx: &TickContext, env: &mut CycleEnv<'_>) -> Option<CycleOutcome> {
        let delay = self.config.replan_delay_cycles;
        if self.exhausted_cycles < delay {
            self.exhausted_cycles = self.exhausted_cycles.saturating_add(1);
            let remaining = delay - self.exhausted_cycles + 1;
            self.emit(ctx, "psi.plan.throttled", remaining.to_string());
            return Some(CycleOutcome::Throttled { remaining });
        }

        // Every attempt re-arms the delay, successful or not.
        self.exhausted_cycles = 0;
        tracing::debug!(cycle = ctx.cycle, "Doing planning");
        self.planner_calls = self.planner_calls.saturating_add(1);
        self.emit(ctx, "psi.plan.call", "");

        if let Err(err) = env.planner.plan(&mut *env.store) {
            tracing::error!(cycle = ctx.cycle, error = %err, "Planning failed");
            self.emit(ctx, "psi.plan.error", err.to_string());
            return Some(CycleOutcome::PlanningFailed);
        }

        let Some(plan) = self.cache.get_plan(&*env.store) else {
            tracing::warn!(
                cycle = ctx.cycle,
                "Planning can not find any suitable plan for the selected demand goal"
            );
            self.emit(ctx, "psi.plan.none", "");
            return Some(CycleOutcome::NoPlan);
        };

        for handle in plan.salient_handles() {
            env.store.stimulate(handle, self.config.stimulus);
        }
        demand::set_current_demand_goal(&mut *env.store, plan.selected_goal);

        tracing::info!(
            cycle = ctx.cycle,
            goal = %plan.selected_goal,
            rules = plan.rule_refs.len(),
            contexts = plan.context_refs.len(),
            "Adopted plan\n{plan}"
        );
        self.emit(ctx, "psi.plan.adopted", plan.action_tree.to_string());

        self.current_goal = Some(plan.selected_goal);
        self.cache.adopt(plan);
        self.plans_adopted = self.plans_adopted.saturating_add(1);
        None
    }

    fn emit(&mut self, ctx: &TickContext, tag: &'static str, detail: impl Into<String>) {
        self.trace
            .emit(TraceEvent::new(ctx.cycle, tag).with_detail(detail));
    }
}
