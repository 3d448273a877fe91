//! Mirror Sync - pushes legacy desktop-database snapshots to a remote
//! table store.
//!
//! One invocation is one run: load the local dump, reconcile each
//! configured table against the remote store, submit the resulting plan,
//! and report per-table counts. Exits non-zero if any table failed.
//!
//! `mirror-sync schema <table>` instead prints the remote `CREATE TABLE`
//! statement derived from the dump's column schema.

use mirror_sync::config::Config;
use mirror_sync::remote::RestStore;
use mirror_sync::runner::Orchestrator;
use mirror_sync::source::{JsonSnapshot, SnapshotSource};
use mirror_sync::tables;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirror_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    // `schema` only needs the dump, not the remote credentials.
    let mut args = std::env::args().skip(1);
    if let Some(command) = args.next() {
        if command == "schema" {
            let table = args.next().ok_or("usage: mirror-sync schema <table>")?;
            let path: std::path::PathBuf = std::env::var("SOURCE_PATH")
                .map_err(|_| "SOURCE_PATH environment variable is required")?
                .into();
            let snapshot = JsonSnapshot::open(&path)?.table(&table)?;
            println!("{}", mirror_engine::create_table_sql(&table, &snapshot.columns));
            return Ok(());
        }
        return Err(format!("unknown command: {command}").into());
    }

    // Load configuration
    let config = Config::from_env()?;
    let source = JsonSnapshot::open(&config.source_path)?;

    let remote = RestStore::new(
        config.remote_url.clone(),
        config.remote_key.clone(),
        config.remote_timeout,
    )?;
    let jobs = tables::default_jobs(config.since);

    tracing::info!(
        tables = jobs.len(),
        since = %config.since,
        "starting sync run"
    );

    let orchestrator = Orchestrator::new(&remote, &source);
    let report = orchestrator.run_all(&jobs).await;

    if report.failed() {
        tracing::error!("sync run finished with failures");
        std::process::exit(1);
    }

    tracing::info!("sync run complete");
    Ok(())
}
