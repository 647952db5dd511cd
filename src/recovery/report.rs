use std::path::Path;

use super::RecoveryOutcome;
use crate::errors::Result;
use crate::models::PLAIN_TIMESTAMP_FORMAT;

pub fn render_report(outcome: &RecoveryOutcome) -> String {
    let mut lines = vec![
        "PRODUCT SCRAPING RECOVERY REPORT".to_string(),
        "=".repeat(50),
        format!("Total products recovered: {}", outcome.len()),
        String::new(),
        "Recovery methods used:".to_string(),
    ];

    for (tag, count) in outcome.source_counts() {
        lines.push(format!("  - {}: {} products", tag, count));
    }

    lines.push(String::new());
    lines.push("Recovered products:".to_string());
    lines.push("-".repeat(30));

    for record in &outcome.records {
        lines.push(format!("ID: {}", record.id()));
        lines.push(format!("  Name: {}", record.name()));
        lines.push(format!("  Rarity: {}", record.rarity()));
        lines.push(format!("  Value: {:?}", record.value()));
        lines.push(format!("  Method: {}", record.source()));
        lines.push(format!(
            "  Updated: {}",
            record.last_updated().format(PLAIN_TIMESTAMP_FORMAT)
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}

pub async fn write_report(path: &Path, report: &str) -> Result<()> {
    tokio::fs::write(path, report).await?;
    Ok(())
}
