use std::sync::Arc;
use std::time::Instant;

use log2discord::noop_transport::NoopTransport;
use log2discord::{LogEvent, Notifier, NotifierOptions};

/// Measures payload assembly and dispatch overhead without any network I/O.
#[tokio::main]
async fn main() {
    let config = match NotifierOptions::new("http://127.0.0.1:1/unused")
        .pid(true)
        .host(true)
        .locale_and_zone("en-US", "America/New_York")
        .resolve()
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return;
        }
    };
    let notifier = Notifier::with_transport(config, Arc::new(NoopTransport));

    let n: u64 = 100_000;
    let start = Instant::now();

    let mut dispatches = Vec::with_capacity(n as usize);
    for i in 0..n {
        dispatches.push(notifier.error(LogEvent::new("load test error").field("iteration", i)));
    }
    let mut failed = 0u64;
    for dispatch in dispatches {
        if dispatch.await.is_err() {
            failed += 1;
        }
    }

    let elapsed = start.elapsed();
    println!(
        "sent {} events ({} failed) in {:?} (~{:.0} ev/s)",
        n,
        failed,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
