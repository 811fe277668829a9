use crate::event::LogEvent;
use crate::notifier::Notifier;
use crate::severity::Severity;
use serde_json::{Map, Value};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::runtime::Handle;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Targets whose events are never forwarded: this crate and the HTTP stack
/// it sends through. Forwarding those would feed every request back into
/// another request.
const IGNORED_TARGETS: &[&str] = &["log2discord", "reqwest", "hyper", "h2", "rustls"];

/// `tracing_subscriber` layer that turns events into webhook notifications.
///
/// By default only `ERROR` events are forwarded. Each forwarded event
/// becomes one request on a background task; the application thread never
/// waits on the network. The event's `message` becomes the notification
/// text, its target the title, and every other field the JSON block.
pub struct NotifierLayer {
    notifier: Notifier,
    runtime: Option<Handle>,
    min_level: Level,
    /// Total events seen by the layer (before filtering).
    pub total_events: Arc<AtomicU64>,
    /// Handed to the notifier.
    pub forwarded_events: Arc<AtomicU64>,
    /// Filtered out by level or target, or dropped for lack of a runtime.
    pub skipped_events: Arc<AtomicU64>,
}

impl NotifierLayer {
    /// Create a layer forwarding events at `min_level` or more severe.
    ///
    /// When called inside a Tokio runtime, that runtime is used for every
    /// delivery, so events emitted from plain threads are still sent.
    pub fn new(notifier: Notifier, min_level: Level) -> Self {
        Self {
            notifier,
            runtime: Handle::try_current().ok(),
            min_level,
            total_events: Arc::new(AtomicU64::new(0)),
            forwarded_events: Arc::new(AtomicU64::new(0)),
            skipped_events: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Deliver on `handle` regardless of where events are emitted.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    fn skip(&self) {
        self.skipped_events.fetch_add(1, Ordering::Relaxed);
    }
}

fn is_ignored(target: &str) -> bool {
    IGNORED_TARGETS.iter().any(|prefix| {
        target
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

impl<S> Layer<S> for NotifierLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let meta = event.metadata();
        if *meta.level() > self.min_level || is_ignored(meta.target()) {
            self.skip();
            return;
        }

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            self.skip();
            eprintln!("log2discord: no Tokio runtime, dropping event");
            return;
        };

        let mut fields = Map::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let mut log_event = LogEvent::new(message.unwrap_or_default()).title(meta.target());
        if !fields.is_empty() {
            log_event = log_event.json(fields);
        }

        let severity = Severity::from(*meta.level());
        let notifier = self.notifier.clone();
        self.forwarded_events.fetch_add(1, Ordering::Relaxed);
        runtime.spawn(async move {
            if let Err(e) = notifier.deliver(severity, log_event).await {
                eprintln!("log2discord: error delivering event: {}", e);
            }
        });
    }
}

use tracing::field::{Field, Visit};

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Map<String, Value>,
    pub message: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    // Format-string messages arrive here as `fmt::Arguments`.
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, Value::String(format!("{:?}", value)));
        }
    }
}
