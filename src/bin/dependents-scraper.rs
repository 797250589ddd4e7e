use clap::Parser;
use colored::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use viem_dependents::cli::ScraperCli;
use viem_dependents::dependents::DependentsScraper;
use viem_dependents::output;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = ScraperCli::parse();

    println!("{}", "viem Dependents Scraper".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    if let Err(e) = run(&cli).await {
        eprintln!("{} {}", "❌ Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: &ScraperCli) -> anyhow::Result<()> {
    let started = Instant::now();
    let config = cli.config();
    println!("📡 Scraping {}", config.start_url()?);

    let scraper = DependentsScraper::new(config)?;
    let report = scraper.run_to_file(&cli.output).await?;
    output::print_scrape_summary(&report, &cli.output, started.elapsed());

    Ok(())
}
