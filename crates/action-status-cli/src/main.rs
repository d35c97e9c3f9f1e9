use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use action_status_core::impls::LogObserver;
use action_status_core::ports::{ActionHandler, HandlerOperation, StatusObserver};
use action_status_core::{ActionError, ActionStatus, Transition};
use async_trait::async_trait;
use clap::Parser;
use tokio::time::{Duration, sleep};
use tracing_subscriber::EnvFilter;

/// Drive an action tracker against a simulated operation and print what happens.
#[derive(Debug, Parser)]
#[command(name = "action-status", version)]
struct Args {
    /// How long each simulated call takes.
    #[arg(long, default_value_t = 200)]
    latency_ms: u64,

    /// Switch to `delayed` after this long (overrides --options).
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Number of calls to fire.
    #[arg(long, default_value_t = 1)]
    calls: u32,

    /// Gap between consecutive calls.
    #[arg(long, default_value_t = 50)]
    gap_ms: u64,

    /// Make the simulated operation fail.
    #[arg(long)]
    fail: bool,

    /// JSON options file, e.g. {"delay_timeout_ms": 100}.
    #[arg(long)]
    options: Option<PathBuf>,
}

/// Simulated remote call: waits, then echoes the call number or fails.
struct Simulated {
    latency: Duration,
    fail: bool,
}

#[async_trait]
impl ActionHandler<u32> for Simulated {
    type Output = String;
    type Error = String;

    async fn handle(&self, call: u32) -> Result<String, String> {
        sleep(self.latency).await;
        if self.fail {
            return Err(format!("call #{call} failed"));
        }
        Ok(format!("result of call #{call}"))
    }
}

/// Prints each transition with the elapsed time since start.
struct PrintObserver {
    started: Instant,
}

impl StatusObserver for PrintObserver {
    fn on_transition(&self, t: &Transition) {
        println!(
            "[{:>5}ms] {} {} -> {}",
            self.started.elapsed().as_millis(),
            t.invocation,
            t.from,
            t.to
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let started = Instant::now();

    let op = HandlerOperation::new(Simulated {
        latency: Duration::from_millis(args.latency_ms),
        fail: args.fail,
    });
    let mut builder = ActionStatus::builder(op)
        .observer(LogObserver::named("demo"))
        .shared_observer(Arc::new(PrintObserver { started }));

    if let Some(path) = &args.options {
        let json = std::fs::read_to_string(path)?;
        builder = builder.options_json(&json)?;
    }
    if let Some(ms) = args.delay_ms {
        builder = builder.delay_timeout(Duration::from_millis(ms));
    }
    let tracker = builder.build()?;
    tracing::info!(options = ?tracker.options(), calls = args.calls, "starting");

    // fire all calls first; each one supersedes the previous
    let mut pending = Vec::with_capacity(args.calls as usize);
    for call in 1..=args.calls {
        pending.push((call, tracker.action(call)));
        if call < args.calls {
            sleep(Duration::from_millis(args.gap_ms)).await;
        }
    }

    for (call, fut) in pending {
        match fut.await {
            Ok(value) => println!("call #{call}: ok ({value})"),
            Err(ActionError::Failed(e)) => println!("call #{call}: failed ({e})"),
            Err(e) if e.is_cancelled() => {
                println!("call #{call}: dropped ({})", e.reason().unwrap_or("cancelled"))
            }
            Err(e) => println!("call #{call}: {e}"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&tracker.view())?);
    tracker.dispose();
    Ok(())
}
