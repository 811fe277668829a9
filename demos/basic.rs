use log2discord::{LogEvent, Notifier, NotifierOptions};
use std::fmt;

#[derive(Debug)]
struct FakeError;

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fake error")
    }
}

impl std::error::Error for FakeError {}

/// Sends one message per level. Needs `LOG2DISCORD_WEBHOOK` in the
/// environment; the other `LOG2DISCORD_*` variables are optional.
#[tokio::main]
async fn main() {
    let options = match NotifierOptions::from_env() {
        Ok(options) => options.name("test2discord").pid(true).host(true),
        Err(e) => {
            eprintln!("skipping: {}", e);
            return;
        }
    };
    let notifier = match Notifier::from_options(options) {
        Ok(notifier) => notifier,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return;
        }
    };

    let data = |event: LogEvent| event.field("valid", "json data").field("not", "invalid json data");

    let results = [
        notifier
            .error(data(LogEvent::new("This is an error message").title("Error detected")).error(&FakeError))
            .await,
        notifier
            .warn(data(LogEvent::new("This is a warning message").title("Warning detected")))
            .await,
        notifier
            .debug(data(LogEvent::new("This is a debug message").title("Debug detected")))
            .await,
        notifier
            .info(data(LogEvent::new("This is an info message").title("Info detected")))
            .await,
        notifier
            .custom(
                data(LogEvent::new("This is a custom message").title("Custom detected"))
                    .kind("LOUD CUSTOM TYPE")
                    .color(123),
            )
            .await,
    ];

    for result in results {
        if let Err(e) = result {
            eprintln!("delivery failed: {}", e);
        }
    }
}
