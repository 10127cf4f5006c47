//! Line-oriented trace sink for the command line.
//!
//! Emits one line per render: text for humans, or one JSON object per line
//! (step payload and replayed state included) for tooling.

use serde::Serialize;
use serde_json::{json, Value};

use crate::engine::{GreedyAlgorithm, Step};
use crate::renderers::RenderSink;

/// Output format for [`TraceSink`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    /// `[ 3/11] select   Select A (1-4): ...`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug)]
struct Pending {
    description: String,
    source_line: Option<&'static str>,
    step: Value,
    state: Value,
}

/// Sink that turns every render into a trace line.
#[derive(Debug, Default)]
pub struct TraceSink {
    format: TraceFormat,
    pending: Option<Pending>,
    lines: Vec<String>,
}

impl TraceSink {
    /// Create a sink.
    #[must_use]
    pub const fn new(format: TraceFormat) -> Self {
        Self {
            format,
            pending: None,
            lines: Vec::new(),
        }
    }

    /// Lines produced so far.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drain the lines produced so far.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    fn emit(&mut self, current: usize, total: usize) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let line = match self.format {
            TraceFormat::Text => {
                let width = total.to_string().len();
                format!(
                    "[{current:>width$}/{total}] {:<8} {}",
                    pending.source_line.unwrap_or("-"),
                    pending.description
                )
            }
            TraceFormat::Json => json!({
                "index": current.saturating_sub(1),
                "total": total,
                "source_line": pending.source_line,
                "description": pending.description,
                "step": pending.step,
                "state": pending.state,
            })
            .to_string(),
        };
        self.lines.push(line);
    }
}

impl<A: GreedyAlgorithm> RenderSink<A> for TraceSink {
    fn render(&mut self, step: &Step<A::Kind>, state: &A::State) {
        let (step_json, state_json) = match self.format {
            TraceFormat::Text => (Value::Null, Value::Null),
            TraceFormat::Json => (
                serde_json::to_value(&step.kind).unwrap_or_default(),
                serde_json::to_value(state).unwrap_or_default(),
            ),
        };
        self.pending = Some(Pending {
            description: step.description.clone(),
            source_line: step.source_line,
            step: step_json,
            state: state_json,
        });
    }

    fn render_empty(&mut self) {
        self.pending = None;
        let line = match self.format {
            TraceFormat::Text => "(no data)".to_string(),
            TraceFormat::Json => json!({ "index": null, "total": 0, "description": "no data" }).to_string(),
        };
        self.lines.push(line);
    }

    fn update_counter(&mut self, current: usize, total: usize) {
        self.emit(current, total);
    }
}
