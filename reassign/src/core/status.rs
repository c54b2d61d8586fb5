//! Parsing of the reassignment tool's human-readable output.
//!
//! The tool has no machine-readable mode, so these functions are the only
//! place that knows its banner and status wording.

use crate::common::topic_partition::ReplicaPlan;

use super::err::{ReassignError, ReassignResult};

pub const CURRENT_BANNER: &str = "Current partition replica assignment";
pub const PROPOSED_BANNER: &str = "Proposed partition reassignment configuration";
pub const STATUS_HEADER: &str = "Status";
pub const THROTTLE_REMOVED: &str = "Throttle was removed.";
pub const SUCCESS_MARKER: &str = "successfully";
pub const FAILURE_MARKER: &str = "not completed: ";

/// The two JSON documents printed by a generate run, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlans {
    pub current: String,
    pub proposed: String,
}

/// Extracts the JSON line following each banner. Both must parse as a plan.
pub fn parse_generate_output(output: &str) -> ReassignResult<GeneratedPlans> {
    let lines: Vec<&str> = output.lines().collect();
    let current = line_after(&lines, CURRENT_BANNER)?;
    let proposed = line_after(&lines, PROPOSED_BANNER)?;
    Ok(GeneratedPlans {
        current: current.to_string(),
        proposed: proposed.to_string(),
    })
}

fn line_after<'a>(lines: &[&'a str], banner: &str) -> ReassignResult<&'a str> {
    let idx = lines
        .iter()
        .position(|line| line.contains(banner))
        .ok_or_else(|| ReassignError::GenerateOutput(format!("missing \"{}\"", banner)))?;
    let doc = lines
        .get(idx + 1)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| ReassignError::GenerateOutput(format!("nothing after \"{}\"", banner)))?;
    serde_json::from_str::<ReplicaPlan>(doc).map_err(|e| {
        ReassignError::GenerateOutput(format!("plan after \"{}\" is not valid: {}", banner, e))
    })?;
    Ok(doc)
}

/// Returns the partition lines of a verify run that did not report success.
/// In-progress partitions count as failures for this attempt.
pub fn verify_failures(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.contains(STATUS_HEADER) && !line.contains(THROTTLE_REMOVED))
        .filter(|line| !line.contains(SUCCESS_MARKER))
        .map(str::to_string)
        .collect()
}

/// Joins the last-seen failures into one message.
pub fn aggregate_failures(failures: &[String]) -> String {
    failures
        .iter()
        .map(|line| format!("{}{}", FAILURE_MARKER, line))
        .collect::<Vec<String>>()
        .join(", ")
}
