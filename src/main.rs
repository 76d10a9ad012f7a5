use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use expense_bench::application::comparison::{ComparisonHarness, DEFAULT_STRESS_REQUESTS};
use expense_bench::application::service::ExpenseService;
use expense_bench::application::strategy::{PipelineStrategy, ProcessingDelays, SequentialStrategy};
use expense_bench::domain::ports::{NotifierRef, Stores};
use expense_bench::infrastructure::notifier::LoggingNotifier;
use expense_bench::infrastructure::{in_memory, seed};
use expense_bench::interfaces::http;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server exposing both execution modes.
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Skip seeding the demo dataset.
        #[arg(long)]
        no_seed: bool,
    },
    /// Run the comparison harness once and print its reports.
    Bench {
        #[arg(long, default_value_t = DEFAULT_STRESS_REQUESTS)]
        requests: usize,

        /// Zero out all simulated latencies.
        #[arg(long)]
        fast: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            port,
            db_path,
            no_seed,
        } => serve(port, db_path, no_seed).await,
        Command::Bench { requests, fast } => bench(requests, fast).await,
    }
}

fn open_stores(db_path: Option<PathBuf>) -> Result<Stores> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => expense_bench::infrastructure::rocksdb::stores(path).into_diagnostic(),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(in_memory::stores())
        }
        None => Ok(in_memory::stores()),
    }
}

/// Explicit composition: stores are built once, then handed into one service
/// per execution mode.
fn build_services(
    stores: &Stores,
    delays: ProcessingDelays,
) -> (Arc<ExpenseService>, Arc<ExpenseService>) {
    let notifier: NotifierRef = Arc::new(LoggingNotifier);
    let pipeline = Arc::new(ExpenseService::new(
        stores.clone(),
        Arc::clone(&notifier),
        Arc::new(PipelineStrategy),
        delays,
    ));
    let blocking = Arc::new(ExpenseService::new(
        stores.clone(),
        notifier,
        Arc::new(SequentialStrategy),
        delays,
    ));
    (pipeline, blocking)
}

async fn serve(port: u16, db_path: Option<PathBuf>, no_seed: bool) -> Result<()> {
    let stores = open_stores(db_path)?;
    if !no_seed {
        seed::seed(&stores).await.into_diagnostic()?;
    }

    let (pipeline, blocking) = build_services(&stores, ProcessingDelays::default());
    let harness = Arc::new(ComparisonHarness::new(
        Arc::clone(&pipeline),
        Arc::clone(&blocking),
        Arc::clone(&stores.users),
        Arc::clone(&stores.categories),
    ));
    let app = http::router(pipeline, blocking, harness);

    let addr = format!("0.0.0.0:{port}");
    info!(%addr, "expense-bench server starting");
    let listener = tokio::net::TcpListener::bind(&addr).await.into_diagnostic()?;
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

async fn bench(requests: usize, fast: bool) -> Result<()> {
    let stores = in_memory::stores();
    seed::seed(&stores).await.into_diagnostic()?;

    let delays = if fast {
        ProcessingDelays::zero()
    } else {
        ProcessingDelays::default()
    };
    let (pipeline, blocking) = build_services(&stores, delays);
    let harness = ComparisonHarness::new(
        pipeline,
        blocking,
        Arc::clone(&stores.users),
        Arc::clone(&stores.categories),
    );

    println!("{}", harness.performance_report().await);
    println!("{}", harness.stress_report(requests).await);
    Ok(())
}
