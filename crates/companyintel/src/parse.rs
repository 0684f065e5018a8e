//! Permissive parsing of the free-text form inputs.
//!
//! Malformed lines are dropped, never reported.

use crate::types::ManualCompany;

/// Parses `name,url` lines. The first comma separates the two parts; both
/// are trimmed and a line missing either one is skipped.
pub fn parse_manual_companies(input: &str) -> Vec<ManualCompany> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (name, url) = line.split_once(',')?;
            let (name, url) = (name.trim(), url.trim());
            if name.is_empty() || url.is_empty() {
                log::debug!("Skipping manual company line without name or URL: {}", line);
                return None;
            }
            Some(ManualCompany {
                company_name: name.to_string(),
                company_url: url.to_string(),
            })
        })
        .collect()
}

/// One search query per non-blank line.
pub fn parse_search_queries(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
