use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::models::Job;

/// The one user-facing message for a bad file. Malformed JSON and
/// missing/empty fields are deliberately reported the same way.
pub const INVALID_INPUT: &str = "invalid JSON or missing fields in job data";

/// Parse an export into jobs, preserving input order. All-or-nothing: a
/// single element with a missing, non-string, or empty field rejects the
/// entire batch and no jobs are returned.
pub fn parse_jobs(text: &str) -> Result<Vec<Job>> {
    let jobs: Vec<Job> = match serde_json::from_str(text) {
        Ok(jobs) => jobs,
        Err(_) => bail!(INVALID_INPUT),
    };
    if jobs.iter().any(|job| !job.is_complete()) {
        bail!(INVALID_INPUT);
    }
    Ok(jobs)
}

pub fn read_jobs(path: &Path) -> Result<Vec<Job>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_jobs(&text)
}
