use crate::config::NotifierConfig;
use crate::event::LogEvent;
use crate::payload::{Embed, EmbedAuthor, EmbedField, EmbedFooter, WebhookPayload};
use crate::severity::Severity;
use crate::transport::WebhookTransport;
use std::error::Error;
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Sends log events to a chat webhook, one POST per call.
///
/// Cloning is cheap: configuration and transport are shared. Every call is
/// independent, so any number of them may run concurrently. There is no
/// batching, rate limiting or retry.
#[derive(Clone)]
pub struct Notifier {
    config: Arc<NotifierConfig>,
    transport: Arc<dyn WebhookTransport>,
    runtime: Option<Handle>,
}

impl Notifier {
    /// Construct a notifier that posts through a fresh `reqwest` client.
    #[cfg(feature = "http")]
    pub fn new(config: NotifierConfig) -> Self {
        Self::with_transport(config, Arc::new(crate::http::ReqwestTransport::new()))
    }

    /// Resolve `options` and construct a `reqwest`-backed notifier.
    #[cfg(feature = "http")]
    pub fn from_options(
        options: crate::config::NotifierOptions,
    ) -> Result<Self, crate::config::ConfigError> {
        Ok(Self::new(options.resolve()?))
    }

    pub fn with_transport(config: NotifierConfig, transport: Arc<dyn WebhookTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            runtime: None,
        }
    }

    /// Spawn requests on `handle` instead of the ambient runtime, so calls
    /// from threads outside any Tokio runtime still dispatch.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    pub fn error(&self, event: impl Into<LogEvent>) -> Dispatch {
        self.emit(Severity::Error, event)
    }

    pub fn warn(&self, event: impl Into<LogEvent>) -> Dispatch {
        self.emit(Severity::Warning, event)
    }

    pub fn debug(&self, event: impl Into<LogEvent>) -> Dispatch {
        self.emit(Severity::Debug, event)
    }

    pub fn info(&self, event: impl Into<LogEvent>) -> Dispatch {
        self.emit(Severity::Info, event)
    }

    /// Like the other levels, but the event's `kind` and `color` are used
    /// as label and color when set.
    pub fn custom(&self, event: impl Into<LogEvent>) -> Dispatch {
        self.emit(Severity::Custom, event)
    }

    /// Build the payload now and POST it on a background task.
    ///
    /// **Returns**
    /// - a [`Dispatch`] that resolves once the request completed or failed.
    ///   Dropping it leaves the request running; awaiting it surfaces
    ///   transport failures.
    pub fn emit(&self, severity: Severity, event: impl Into<LogEvent>) -> Dispatch {
        let payload = self.build_payload(severity, &event.into());

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            return Dispatch::ready(Err(NotifyError::NoRuntime));
        };

        let transport = Arc::clone(&self.transport);
        let config = Arc::clone(&self.config);
        let handle = runtime.spawn(async move {
            send(&*transport, &config.endpoint, severity, &payload).await
        });
        Dispatch::spawned(handle)
    }

    /// Build and send inline, without spawning a task.
    pub async fn deliver(
        &self,
        severity: Severity,
        event: impl Into<LogEvent>,
    ) -> Result<(), NotifyError> {
        let payload = self.build_payload(severity, &event.into());
        send(&*self.transport, &self.config.endpoint, severity, &payload).await
    }

    /// Assemble the outbound body for one call. The footer timestamp, host
    /// name and process id are read at the time of this call.
    pub fn build_payload(&self, severity: Severity, event: &LogEvent) -> WebhookPayload {
        let (label, color) = resolve_style(severity, event);

        let embed = Embed {
            color,
            author: EmbedAuthor { name: label },
            title: event.title.clone(),
            description: event.description(),
            fields: self.fields(),
            footer: EmbedFooter {
                text: self.config.time_display.now(),
                icon_url: self.config.icon_url.clone(),
            },
        };

        WebhookPayload {
            username: self.config.display_name.clone(),
            avatar_url: self.config.icon_url.clone(),
            embeds: vec![embed],
        }
    }

    fn fields(&self) -> Vec<EmbedField> {
        let mut fields = Vec::new();
        if self.config.show_host {
            let host = gethostname::gethostname().to_string_lossy().into_owned();
            fields.push(EmbedField::inline("Host", host));
        }
        if self.config.show_process_id {
            fields.push(EmbedField::inline("PID", std::process::id()));
        }
        fields
    }
}

/// Label and color for an event. Fixed levels ignore the event's own
/// `kind` / `color`.
fn resolve_style(severity: Severity, event: &LogEvent) -> (String, u32) {
    if !severity.accepts_overrides() {
        return (severity.label().to_string(), severity.color());
    }

    let label = event
        .kind
        .as_deref()
        .filter(|kind| !kind.is_empty())
        .unwrap_or(severity.label());
    (label.to_string(), event.color.unwrap_or(severity.color()))
}

async fn send(
    transport: &dyn WebhookTransport,
    endpoint: &str,
    severity: Severity,
    payload: &WebhookPayload,
) -> Result<(), NotifyError> {
    tracing::debug!(%severity, "posting webhook payload");
    transport
        .post(endpoint, payload)
        .await
        .map_err(NotifyError::Transport)
}

/// Error surfaced through a [`Dispatch`] or [`Notifier::deliver`].
#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[source] Box<dyn Error + Send + Sync>),

    #[error("webhook dispatch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("no Tokio runtime available to dispatch the webhook request")]
    NoRuntime,
}

/// Pending result of one log call.
///
/// Await it to learn whether the request went through; drop it to fire and
/// forget. The request keeps running either way.
pub struct Dispatch {
    state: DispatchState,
}

enum DispatchState {
    Spawned(JoinHandle<Result<(), NotifyError>>),
    Ready(future::Ready<Result<(), NotifyError>>),
}

impl Dispatch {
    fn spawned(handle: JoinHandle<Result<(), NotifyError>>) -> Self {
        Self {
            state: DispatchState::Spawned(handle),
        }
    }

    fn ready(result: Result<(), NotifyError>) -> Self {
        Self {
            state: DispatchState::Ready(future::ready(result)),
        }
    }

    /// Whether the request has completed, without waiting for it.
    pub fn is_finished(&self) -> bool {
        match &self.state {
            DispatchState::Spawned(handle) => handle.is_finished(),
            DispatchState::Ready(_) => true,
        }
    }
}

impl Future for Dispatch {
    type Output = Result<(), NotifyError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            DispatchState::Spawned(handle) => Pin::new(handle)
                .poll(cx)
                .map(|joined| joined.map_err(NotifyError::Join).and_then(|result| result)),
            DispatchState::Ready(ready) => Pin::new(ready).poll(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifierOptions;
    use crate::noop_transport::NoopTransport;
    use crate::payload::FieldValue;
    use crate::test_support::{FailingTransport, RecordingTransport};

    fn recording(options: NotifierOptions) -> (Notifier, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::with_transport(options.resolve().unwrap(), transport.clone());
        (notifier, transport)
    }

    fn plain() -> Notifier {
        Notifier::with_transport(
            NotifierOptions::new("https://example/test").resolve().unwrap(),
            Arc::new(NoopTransport),
        )
    }

    #[test]
    fn fixed_levels_ignore_caller_kind_and_color() {
        let notifier = plain();
        let event = LogEvent::new("x").kind("ignored").color(1);
        let table = [
            (Severity::Error, "ERROR", 15158332),
            (Severity::Warning, "WARNING", 16159744),
            (Severity::Debug, "DEBUG", 40000),
            (Severity::Info, "INFO", 3447003),
        ];
        for (severity, label, color) in table {
            let payload = notifier.build_payload(severity, &event);
            let embed = payload.embed().unwrap();
            assert_eq!(embed.author.name, label);
            assert_eq!(embed.color, color);
        }
    }

    #[test]
    fn custom_defaults_without_overrides() {
        let payload = plain().build_payload(Severity::Custom, &LogEvent::new("x"));
        let embed = payload.embed().unwrap();
        assert_eq!(embed.author.name, "CUSTOM");
        assert_eq!(embed.color, 12895428);
    }

    #[test]
    fn custom_honors_overrides() {
        let event = LogEvent::new("x").kind("FOO").color(42);
        let payload = plain().build_payload(Severity::Custom, &event);
        let embed = payload.embed().unwrap();
        assert_eq!(embed.author.name, "FOO");
        assert_eq!(embed.color, 42);
    }

    #[test]
    fn custom_treats_empty_kind_as_unset() {
        let event = LogEvent::new("x").kind("");
        let payload = plain().build_payload(Severity::Custom, &event);
        assert_eq!(payload.embed().unwrap().author.name, "CUSTOM");
    }

    #[test]
    fn host_then_pid_when_both_enabled() {
        let (notifier, _) = recording(NotifierOptions::new("x").host(true).pid(true));
        let payload = notifier.build_payload(Severity::Info, &LogEvent::new("x"));
        let fields = &payload.embed().unwrap().fields;

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "Host");
        assert!(matches!(fields[0].value, FieldValue::Text(_)));
        assert_eq!(fields[1].name, "PID");
        assert_eq!(
            fields[1].value,
            FieldValue::Number(u64::from(std::process::id()))
        );
        assert!(fields.iter().all(|f| f.inline));
    }

    #[test]
    fn no_fields_by_default() {
        let payload = plain().build_payload(Severity::Info, &LogEvent::new("x"));
        assert!(payload.embed().unwrap().fields.is_empty());
    }

    #[test]
    fn only_pid_when_host_disabled() {
        let (notifier, _) = recording(NotifierOptions::new("x").pid(true));
        let payload = notifier.build_payload(Severity::Info, &LogEvent::new("x"));
        let fields = &payload.embed().unwrap().fields;
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "PID");
    }

    #[test]
    fn disabled_time_leaves_footer_text_null() {
        let (notifier, _) = recording(
            NotifierOptions::new("x")
                .icon("https://example/icon.png")
                .without_time(),
        );
        let payload = notifier.build_payload(Severity::Info, &LogEvent::new("x"));
        let footer = &payload.embed().unwrap().footer;
        assert_eq!(footer.text, None);
        assert_eq!(footer.icon_url.as_deref(), Some("https://example/icon.png"));
    }

    #[test]
    fn enabled_time_renders_footer_with_icon() {
        let (notifier, _) = recording(
            NotifierOptions::new("x")
                .icon("https://example/icon.png")
                .locale_and_zone("en-US", "America/New_York"),
        );
        let payload = notifier.build_payload(Severity::Info, &LogEvent::new("x"));
        let footer = &payload.embed().unwrap().footer;
        assert!(footer.text.as_deref().is_some_and(|t| !t.is_empty()));
        assert_eq!(footer.icon_url.as_deref(), Some("https://example/icon.png"));
        assert_eq!(payload.avatar_url.as_deref(), Some("https://example/icon.png"));
    }

    #[test]
    fn description_orders_message_json_error() {
        let event = LogEvent::new("M").field("a", 1).trace("S");
        let payload = plain().build_payload(Severity::Error, &event);
        let description = &payload.embed().unwrap().description;

        let m = description.find('M').unwrap();
        let json = description.find("```{\"a\":1}```").unwrap();
        let stack = description.find("```S```").unwrap();
        assert!(m < json && json < stack, "{description}");
    }

    #[test]
    fn identity_and_title_come_through() {
        let (notifier, _) = recording(NotifierOptions::new("x").name("App"));
        let payload = notifier.build_payload(Severity::Info, &LogEvent::new("hi").title("T"));
        assert_eq!(payload.username, "App");
        assert_eq!(payload.avatar_url, None);
        assert_eq!(payload.embed().unwrap().title.as_deref(), Some("T"));
    }

    #[test]
    fn repeated_calls_differ_only_in_footer_time() {
        let (notifier, _) = recording(NotifierOptions::new("x").host(true).pid(true));
        let event = LogEvent::new("same").title("T").field("k", "v");

        let mut first = notifier.build_payload(Severity::Warning, &event);
        let mut second = notifier.build_payload(Severity::Warning, &event);
        first.embeds[0].footer.text = None;
        second.embeds[0].footer.text = None;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn emit_posts_once_to_the_endpoint() {
        let (notifier, transport) = recording(NotifierOptions::new("https://example/test"));
        notifier.info(LogEvent::new("hi").title("T")).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "https://example/test");
        let embed = sent[0].1.embed().unwrap();
        assert_eq!(embed.author.name, "INFO");
        assert_eq!(embed.title.as_deref(), Some("T"));
    }

    #[tokio::test]
    async fn transport_failure_surfaces_through_dispatch() {
        let config = NotifierOptions::new("x").resolve().unwrap();
        let notifier = Notifier::with_transport(config, Arc::new(FailingTransport));

        let err = notifier.error("boom").await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
        assert!(err.to_string().contains("connection refused"));

        let err = notifier.deliver(Severity::Error, "boom").await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }

    #[tokio::test]
    async fn dropped_dispatch_still_delivers() {
        let (notifier, transport) = recording(NotifierOptions::new("x"));
        drop(notifier.warn("fire and forget"));
        assert_eq!(transport.wait_for(1).await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_calls_are_independent() {
        let (notifier, transport) = recording(NotifierOptions::new("x"));
        let dispatches: Vec<Dispatch> = (0..20)
            .map(|i| notifier.debug(format!("event {i}")))
            .collect();
        for dispatch in dispatches {
            dispatch.await.unwrap();
        }
        assert_eq!(transport.sent().len(), 20);
    }

    #[test]
    fn no_runtime_resolves_to_error() {
        let dispatch = plain().info("outside any runtime");
        assert!(dispatch.is_finished());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt.block_on(dispatch).unwrap_err();
        assert!(matches!(err, NotifyError::NoRuntime));
    }

    #[test]
    fn pinned_runtime_dispatches_from_plain_threads() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (notifier, transport) = recording(NotifierOptions::new("x"));
        let notifier = notifier.with_runtime(rt.handle().clone());

        let dispatch = std::thread::spawn(move || notifier.info("from a plain thread"))
            .join()
            .unwrap();
        rt.block_on(dispatch).unwrap();
        assert_eq!(transport.sent().len(), 1);
    }
}
