//! Fired-rule events and the sinks that receive them.
//!
//! The simulators never print. When tracing is requested they hand one
//! [`TraceEvent`] per fired rule to a [`TraceSink`]; the caller decides
//! whether to collect, log or discard them.

use crate::error::BranchFailure;
use crate::symbol::{DELTA_GLYPH, LAMBDA_GLYPH};
use std::fmt;

/// One step of a simulation, in the order the search performed it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum TraceEvent {
    /// An NFA cell fired. `symbol` is `None` for a λ-move.
    NfaRule {
        /// Source state
        from: String,
        /// Consumed symbol
        symbol: Option<char>,
        /// Target states, in declaration order
        targets: Vec<String>,
    },

    /// An NPDA move fired. `input` is `None` for a λ-move.
    NpdaRule {
        /// Source state
        from: String,
        /// Consumed symbol
        input: Option<char>,
        /// Popped stack top
        top: char,
        /// Target state
        to: String,
        /// Replacement string, top-first (ε when empty)
        push: String,
        /// Stack after the move, bottom-first
        stack_after: String,
    },

    /// An NPDA branch stopped without accepting.
    NpdaBranchFailed {
        /// State of the failed configuration
        state: String,
        /// Input position of the failed configuration
        position: usize,
        /// Why the branch stopped
        failure: BranchFailure,
    },

    /// One sentential form on the reported CFG derivation.
    Derivation {
        /// The sentential form (ε when empty)
        form: String,
        /// Production that produced it; `None` for the start variable
        production: Option<String>,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::NfaRule {
                from,
                symbol,
                targets,
            } => write!(
                f,
                "Executing Rule: {}({}, {}) = {}",
                DELTA_GLYPH,
                from,
                symbol.unwrap_or(LAMBDA_GLYPH),
                crate::definition::render_names(targets)
            ),
            TraceEvent::NpdaRule {
                from,
                input,
                top,
                to,
                push,
                stack_after,
            } => write!(
                f,
                "Executing Rule: {}({}, {}, {}) = ({}, {})\n\tStack contents after execution: {}",
                DELTA_GLYPH,
                from,
                input.unwrap_or(LAMBDA_GLYPH),
                top,
                to,
                push,
                stack_after
            ),
            TraceEvent::NpdaBranchFailed {
                state,
                position,
                failure,
            } => write!(
                f,
                "Branch failed in state '{}' at input position {}: {}",
                state, position, failure
            ),
            TraceEvent::Derivation { form, production } => match production {
                Some(production) => write!(f, "{}\t\tusing: {}", form, production),
                None => f.write_str(form),
            },
        }
    }
}

/// Receiver of trace events.
///
/// Simulators check [`enabled`](Self::enabled) before building an event, so
/// a disabled sink costs nothing on the hot path.
pub trait TraceSink {
    /// Whether events should be produced at all.
    fn enabled(&self) -> bool {
        true
    }

    /// Receive one event.
    fn record(&mut self, event: TraceEvent);
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn record(&mut self, event: TraceEvent) {
        (**self).record(event)
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _event: TraceEvent) {}
}

/// Sink that keeps every event in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecSink {
    /// Collected events
    pub events: Vec<TraceEvent>,
}

impl VecSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the sink, returning the collected events.
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}

impl TraceSink for VecSink {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Sink that forwards every event to the `log` facade at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn enabled(&self) -> bool {
        log::log_enabled!(log::Level::Trace)
    }

    fn record(&mut self, event: TraceEvent) {
        log::trace!("{}", event);
    }
}
