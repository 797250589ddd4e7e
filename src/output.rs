use crate::error::Result;
use crate::models::{CollectionReport, RepositoryRecord};
use colored::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Order records by stars, most popular first.
pub fn sort_by_stars(records: &mut [RepositoryRecord]) {
    records.sort_by(|a, b| b.stars.cmp(&a.stars));
}

/// Write the records as a pretty-printed JSON array, replacing any existing file.
pub fn write_records(path: &Path, records: &[RepositoryRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    info!(path = %path.display(), count = records.len(), "Wrote repositories");
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarStats {
    pub count: usize,
    pub total_stars: u64,
    pub average_stars: f64,
}

pub fn star_stats(records: &[RepositoryRecord]) -> StarStats {
    let total_stars: u64 = records.iter().map(|r| r.stars).sum();
    let average_stars = if records.is_empty() {
        0.0
    } else {
        total_stars as f64 / records.len() as f64
    };

    StarStats {
        count: records.len(),
        total_stars,
        average_stars,
    }
}

/// The `limit` most frequent languages, most common first. Ties are broken by name.
pub fn top_languages(records: &[RepositoryRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for language in records.iter().filter_map(|r| r.language.as_deref()) {
        *counts.entry(language).or_default() += 1;
    }

    let mut languages: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(language, count)| (language.to_string(), count))
        .collect();
    languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    languages.truncate(limit);
    languages
}

fn print_top(records: &[RepositoryRecord], limit: usize) {
    for (rank, record) in records.iter().take(limit).enumerate() {
        println!(
            "{:>3}. {} {} {}",
            rank + 1,
            record.full_name.bold(),
            format!("⭐ {}", record.stars).yellow(),
            record.language.as_deref().unwrap_or("").dimmed()
        );
    }
}

pub fn print_search_summary(report: &CollectionReport, path: &Path, elapsed: Duration) {
    println!("\n{}", "=".repeat(50).dimmed());
    println!(
        "✅ Found {} repositories ({} pages, stopped: {})",
        report.records.len().to_string().bold().green(),
        report.pages_fetched,
        report.stop_reason
    );
    if report.skipped > 0 {
        println!("⚠️ Skipped {} repositories that could not be fetched", report.skipped);
    }
    println!("💾 Saved to {}", path.display());
    println!("⏱️ Took {:.1}s", elapsed.as_secs_f64());

    if !report.records.is_empty() {
        println!("\n{}", "Top 5 by stars:".bold());
        print_top(&report.records, 5);
    }
}

pub fn print_scrape_summary(report: &CollectionReport, path: &Path, elapsed: Duration) {
    let stats = star_stats(&report.records);

    println!("\n{}", "=".repeat(50).dimmed());
    println!("{}", "📊 Final Statistics:".bold());
    println!("Total repositories: {}", stats.count.to_string().bold().green());
    println!("Total stars: {}", stats.total_stars);
    println!("Average stars: {:.1}", stats.average_stars);
    println!(
        "Pages fetched: {} (stopped: {})",
        report.pages_fetched, report.stop_reason
    );
    if report.skipped > 0 {
        println!("Unparseable entries: {}", report.skipped);
    }
    println!("💾 Saved to {}", path.display());
    println!("⏱️ Took {:.1}s", elapsed.as_secs_f64());

    if !report.records.is_empty() {
        println!("\n{}", "Top 10 by stars:".bold());
        print_top(&report.records, 10);
    }

    let languages = top_languages(&report.records, 5);
    if !languages.is_empty() {
        println!("\n{}", "Top languages:".bold());
        for (language, count) in languages {
            println!("  {}: {}", language, count);
        }
    }
}
