use crate::layer::NotifierLayer;
use crate::notifier::Notifier;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the forwarding layer.
///
/// **Fields**
/// - `min_level`: least severe level that is still forwarded to the
///   webhook (`ERROR` forwards only errors, `WARN` adds warnings, ...).
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   stacked on top of [`NotifierLayer`] so events also print to the
///   console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub min_level: Level,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_level: Level::ERROR,
            enable_stdout: true,
        }
    }
}

/// Install a global `tracing` subscriber that forwards events through
/// `notifier`.
///
/// **Parameters**
/// - `notifier`: the [`Notifier`] every forwarded event is sent through.
/// - `config`: [`LayerConfig`] controlling the level threshold and console
///   output.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already installed.
///
/// Call this from inside a Tokio runtime so the layer can bind to it.
pub fn init_tracing_with_config(
    notifier: Notifier,
    config: LayerConfig,
) -> Result<(), SetGlobalDefaultError> {
    let layer = NotifierLayer::new(notifier, config.min_level);

    // Two subscriber shapes because the fmt layer changes the stacked type.
    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Initialize tracing with sensible defaults: errors only, console output
/// on. Equivalent to [`init_tracing_with_config`] with
/// [`LayerConfig::default`].
pub fn init_tracing(notifier: Notifier) -> Result<(), SetGlobalDefaultError> {
    init_tracing_with_config(notifier, LayerConfig::default())
}
