use clap::Parser;
use colored::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use viem_dependents::cli::CollectorCli;
use viem_dependents::output;
use viem_dependents::search::CodeSearchCollector;

#[tokio::main]
async fn main() {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = CollectorCli::parse();

    println!("{}", "viem Code Search Collector".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    if let Err(e) = run(&cli).await {
        eprintln!("{} {}", "❌ Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: &CollectorCli) -> anyhow::Result<()> {
    let started = Instant::now();
    let collector = CodeSearchCollector::new(cli.github_token.clone(), cli.config())?;

    let report = collector.run_to_file(&cli.output).await?;
    output::print_search_summary(&report, &cli.output, started.elapsed());

    Ok(())
}
