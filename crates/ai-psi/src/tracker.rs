//! Lifecycle of the single action in flight.

use ai_plan::ActionDescriptor;

use crate::env::{ActionResultTag, BuiltinValue, EngineValue, ProcedureEngine, ProcedureHandle};
use crate::error::{PsiError, PsiResult};

#[derive(Debug, Clone, PartialEq)]
pub struct InFlightAction {
    pub descriptor: ActionDescriptor,
    pub handle: ProcedureHandle,
    pub started_at_secs: u64,
}

/// Closed decode of a finished procedure's result value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultDecode {
    Success,
    /// An action-result or builtin value other than success.
    Failure,
    Unrecognized(String),
}

impl ResultDecode {
    pub fn decode(value: &EngineValue) -> Self {
        match value {
            EngineValue::ActionResult(ActionResultTag::Success)
            | EngineValue::Builtin(BuiltinValue::LogicalTrue) => ResultDecode::Success,
            EngineValue::ActionResult(_) | EngineValue::Builtin(_) => ResultDecode::Failure,
            EngineValue::Other(raw) => ResultDecode::Unrecognized(raw.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Nothing was in flight.
    Idle,
    /// Still executing within its time budget; the action stays in flight.
    Running,
    /// Finished without an engine-reported failure.
    Completed(ResultDecode),
    /// The engine reported failure.
    Failed,
    /// Exceeded the timeout and was stopped.
    TimedOut,
}

impl Resolution {
    /// Whether the rest of the current action sequence must be dropped.
    pub fn cancels_sequence(&self) -> bool {
        matches!(self, Resolution::Failed | Resolution::TimedOut)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Resolution::Completed(ResultDecode::Success))
    }
}

/// Owns the one action submitted to the procedure engine and not yet resolved.
#[derive(Debug, Clone)]
pub struct ActionLifecycleTracker {
    timeout_secs: u64,
    in_flight: Option<InFlightAction>,
}

impl ActionLifecycleTracker {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            in_flight: None,
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn set_timeout_secs(&mut self, timeout_secs: u64) {
        self.timeout_secs = timeout_secs;
    }

    pub fn in_flight(&self) -> Option<&InFlightAction> {
        self.in_flight.as_ref()
    }

    pub fn is_dispatched(&self) -> bool {
        self.in_flight.is_some()
    }

    /// `Idle → Dispatched`. Refuses while another action is in flight.
    pub fn begin(
        &mut self,
        descriptor: ActionDescriptor,
        handle: ProcedureHandle,
        now_secs: u64,
    ) -> PsiResult<()> {
        if let Some(current) = &self.in_flight {
            return Err(PsiError::ActionInFlight(current.descriptor.to_string()));
        }
        self.in_flight = Some(InFlightAction {
            descriptor,
            handle,
            started_at_secs: now_secs,
        });
        Ok(())
    }

    /// Check the in-flight action; every outcome except `Running` clears it.
    ///
    /// Engine-reported failure is checked before the result value is looked at.
    pub fn poll(&mut self, engine: &mut dyn ProcedureEngine, now_secs: u64, cycle: u64) -> Resolution {
        let Some(current) = self.in_flight.as_ref() else {
            return Resolution::Idle;
        };
        let handle = current.handle;

        let resolution = if engine.is_failed(handle) {
            tracing::debug!(
                cycle,
                action = %current.descriptor,
                schema = %handle,
                "Action failed"
            );
            Resolution::Failed
        } else if engine.is_finished(handle) {
            let value = engine.result(handle);
            let decoded = ResultDecode::decode(&value);
            match &decoded {
                ResultDecode::Success => tracing::debug!(
                    cycle,
                    action = %current.descriptor,
                    schema = %handle,
                    "Action succeeded"
                ),
                ResultDecode::Failure => tracing::debug!(
                    cycle,
                    action = %current.descriptor,
                    schema = %handle,
                    result = %value,
                    "Action finished with a failing result"
                ),
                ResultDecode::Unrecognized(raw) => tracing::warn!(
                    cycle,
                    action = %current.descriptor,
                    schema = %handle,
                    result = %raw,
                    "Action result should be a builtin or an action result"
                ),
            }
            Resolution::Completed(decoded)
        } else if now_secs.saturating_sub(current.started_at_secs) > self.timeout_secs {
            tracing::debug!(
                cycle,
                action = %current.descriptor,
                schema = %handle,
                timeout_secs = self.timeout_secs,
                "Action timed out"
            );
            engine.mark_pending_action_plans_failed();
            engine.stop_procedure(handle);
            Resolution::TimedOut
        } else {
            tracing::debug!(cycle, schema = %handle, "Current action is still running");
            return Resolution::Running;
        };

        self.in_flight = None;
        resolution
    }
}
