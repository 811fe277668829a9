use serde_json::{Map, Value};
use std::error::Error;

/// Per-call data for a single notification.
///
/// `kind` and `color` are only honored on the custom path
/// ([`Notifier::custom`](crate::notifier::Notifier::custom)). The fixed
/// levels (`error`, `warn`, `debug`, `info`) overwrite them with their own
/// label and color, so setting them there has no visible effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEvent {
    pub message: String,
    pub title: Option<String>,
    /// Structured data rendered as a fenced JSON block.
    pub json: Option<Map<String, Value>>,
    /// Rendered error trace, see [`Traceable`].
    pub error: Option<String>,
    pub kind: Option<String>,
    pub color: Option<u32>,
}

impl LogEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the structured data block.
    pub fn json(mut self, json: Map<String, Value>) -> Self {
        self.json = Some(json);
        self
    }

    /// Add a single key to the structured data block, keeping insertion order.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.json
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach an error; its trace is rendered eagerly.
    pub fn error<E: Traceable + ?Sized>(mut self, error: &E) -> Self {
        self.error = Some(error.render_trace());
        self
    }

    /// Attach pre-rendered trace text, e.g. a captured backtrace.
    pub fn trace(mut self, trace: impl Into<String>) -> Self {
        self.error = Some(trace.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Assemble the embed description: message, then the JSON block, then
    /// the error block. The two blocks sit next to each other on the line
    /// after the message.
    pub fn description(&self) -> String {
        let mut out = self.message.clone();
        if self.json.is_none() && self.error.is_none() {
            return out;
        }

        out.push('\n');
        if let Some(json) = &self.json {
            let rendered = serde_json::to_string(json).unwrap_or_else(|_| "{}".to_string());
            push_fenced(&mut out, &rendered);
        }
        if let Some(trace) = &self.error {
            push_fenced(&mut out, trace);
        }
        out
    }
}

fn push_fenced(out: &mut String, body: &str) {
    out.push_str("```");
    out.push_str(body);
    out.push_str("```");
}

impl From<&str> for LogEvent {
    fn from(message: &str) -> Self {
        LogEvent::new(message)
    }
}

impl From<String> for LogEvent {
    fn from(message: String) -> Self {
        LogEvent::new(message)
    }
}

/// Anything that can render a human-readable trace for an event.
///
/// Every [`std::error::Error`] gets this for free: the error itself on the
/// first line, followed by one `Caused by:` line per `source()`.
pub trait Traceable {
    fn render_trace(&self) -> String;
}

impl<E: Error + ?Sized> Traceable for E {
    fn render_trace(&self) -> String {
        let mut out = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            out.push_str("\nCaused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}
