//! Cycle telemetry.
//!
//! Plain data recorded as the cycle runs, independent of the `tracing` log output, so hosts and
//! tests can observe decisions per cycle.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub cycle: u64,
    pub tag: Cow<'static, str>,
    pub detail: String,
}

impl TraceEvent {
    pub fn new(cycle: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            cycle,
            tag: tag.into(),
            detail: String::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl VecTraceSink {
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| e.tag.as_ref())
    }
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_keeps_emission_order() {
        let mut sink = VecTraceSink::default();
        sink.emit(TraceEvent::new(1, "psi.plan.call"));
        sink.emit(TraceEvent::new(1, "psi.plan.adopted").with_detail("seq[eat, sleep]"));
        sink.emit(TraceEvent::new(2, "psi.action.dispatched").with_detail("eat"));

        assert_eq!(
            sink.tags().collect::<Vec<_>>(),
            vec!["psi.plan.call", "psi.plan.adopted", "psi.action.dispatched"]
        );
        assert_eq!(sink.events[1].detail, "seq[eat, sleep]");
        assert_eq!(sink.events[2].cycle, 2);
    }
}
