use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::errors::{RecoveryError, Result};

const FAILURE_MARKER: &str = "Primary scraping failed";
const ID_MARKER: &str = "Product ID:";

/// Pulls the identifiers of failed primary scrapes out of a scraper log.
pub struct LogScanner {
    pattern: Regex,
}

impl LogScanner {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"Product ID: (\S+)")
            .map_err(|e| RecoveryError::Unexpected(format!("bad id pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Identifiers in first-seen order, each reported once.
    pub fn scan(&self, content: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        content
            .lines()
            .filter(|line| line.contains(ID_MARKER) && line.contains(FAILURE_MARKER))
            .filter_map(|line| self.pattern.captures(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    pub async fn scan_file(&self, path: &Path) -> Result<Vec<String>> {
        let content = tokio::fs::read_to_string(path).await?;
        let ids = self.scan(&content);
        info!(count = ids.len(), path = %path.display(), "found failed products in log file");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
[2024-05-01 10:00:00] ERROR: Primary scraping failed - Product ID: minecraft:diamond_sword - timeout
[2024-05-01 10:00:01] INFO: Product ID: minecraft:stone scraped fine
[2024-05-01 10:00:02] ERROR: Primary scraping failed - Product ID: minecraft:elytra - DNS
[2024-05-01 10:00:03] ERROR: Primary scraping failed - no id on this line
[2024-05-01 10:00:04] ERROR: Primary scraping failed - Product ID: minecraft:diamond_sword - retry
";

    #[test]
    fn test_scan_extracts_failed_ids_once() {
        let scanner = LogScanner::new().unwrap();
        assert_eq!(
            scanner.scan(LOG),
            vec!["minecraft:diamond_sword".to_string(), "minecraft:elytra".to_string()]
        );
    }

    #[test]
    fn test_scan_empty_log() {
        let scanner = LogScanner::new().unwrap();
        assert!(scanner.scan("").is_empty());
    }

    #[tokio::test]
    async fn test_scan_missing_file_errors() {
        let scanner = LogScanner::new().unwrap();
        let err = scanner
            .scan_file(Path::new("/nonexistent/pasted.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecoveryError::Io(_)));
    }
}
