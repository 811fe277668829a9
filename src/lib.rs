//! Post application log events to a chat webhook as rich embeds.
//!
//! ```no_run
//! use log2discord::{LogEvent, Notifier, NotifierOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let notifier = Notifier::from_options(
//!     NotifierOptions::new("https://discord.com/api/webhooks/<id>/<token>")
//!         .name("billing")
//!         .host(true)
//!         .pid(true),
//! )?;
//!
//! // Fire and forget.
//! notifier.warn(LogEvent::new("queue is backing up").field("depth", 1200));
//!
//! // Or wait for the request to complete.
//! notifier.info(LogEvent::new("deploy finished").title("Release")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod env;
pub mod event;
pub mod severity;
pub mod time;
pub mod payload;
pub mod transport;
pub mod notifier;
pub mod noop_transport;

#[cfg(feature = "http")]
pub mod http;

pub mod layer;
pub mod init;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, DateTimeOption, DateTimeOptions, NotifierConfig, NotifierOptions};
pub use event::{LogEvent, Traceable};
pub use notifier::{Dispatch, Notifier, NotifyError};
pub use severity::Severity;
