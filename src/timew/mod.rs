//! Parsing of the report that Timewarrior pipes to its extensions.
//!
//! The input is a block of `key: value` configuration lines, one blank line, and then a JSON array
//! of intervals:
//!
//! ```text
//! temp.report.start: 20250228T000000Z
//! verbose: 1
//!
//! [{"id":1,"start":"20250228T063000Z","end":"20250228T070000Z","tags":["acme app: Tests"]}]
//! ```

mod config;
mod interval;
mod timestamp;

pub use config::{ConfigValue, ReportConfig};
pub use interval::{Interval, RawInterval};
pub(crate) use timestamp::parse_compact;
pub use timestamp::{normalize_timestamp, parse_timestamp};

use crate::error::{ErrorType, IntoResult};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A parsed Timewarrior report.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Report {
    config: ReportConfig,
    intervals: Vec<Interval>,
}

impl Report {
    /// Parses the raw text that Timewarrior writes to an extension's stdin.
    ///
    /// # Errors
    /// - Returns an `ErrorType::Parse` error if the interval section is not a JSON array of
    ///   intervals. Malformed configuration lines are skipped and never cause an error.
    pub fn parse(input: &str) -> Result<Self> {
        let (config_section, json_section) = match split_sections(input) {
            Some(sections) => sections,
            None => {
                if !input.trim().is_empty() {
                    warn!(
                        "The report has no blank line before the intervals, \
                        reading it as config only"
                    );
                }
                (input, "")
            }
        };
        let config = ReportConfig::parse(config_section);
        let intervals = parse_intervals(json_section)?;
        debug!(
            "Parsed a report with {} interval(s) and {} config entries",
            intervals.len(),
            config.values().len()
        );
        Ok(Self { config, intervals })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }
}

/// Splits at the first blank line, written with either `\n` or `\r\n` line endings.
fn split_sections(input: &str) -> Option<(&str, &str)> {
    let lf = input.find("\n\n").map(|at| (at, 2));
    let crlf = input.find("\r\n\r\n").map(|at| (at, 4));
    let (at, len) = lf.into_iter().chain(crlf).min_by_key(|(at, _)| *at)?;
    Some((&input[..at], &input[at + len..]))
}

fn parse_intervals(json: &str) -> Result<Vec<Interval>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let raw: Vec<RawInterval> = serde_json::from_str(json)
        .context("The interval section is not a valid JSON array of intervals")
        .pub_result(ErrorType::Parse)?;
    Ok(raw.into_iter().map(Interval::from).collect())
}
