//! The structured `affected-issues` output consumed by later workflow steps.

use std::{fs::OpenOptions, io::Write, path::Path};

use color_eyre::eyre::{Result, WrapErr};

use crate::reconcile::Affected;

pub const AFFECTED_ISSUES_KEY: &str = "affected-issues";

/// `affected-issues=2,4`, or `affected-issues=` when nothing changed.
pub fn affected_issues_line(affected: &Affected) -> String {
	let numbers: Vec<String> = affected.issue_numbers().iter().map(u64::to_string).collect();
	format!("{AFFECTED_ISSUES_KEY}={}", numbers.join(","))
}

/// Append one `key=value` line to the output file.
pub fn append_output(path: &Path, line: &str) -> Result<()> {
	let mut file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(path)
		.wrap_err_with(|| format!("Failed to open output file {}", path.display()))?;
	writeln!(file, "{line}")?;
	Ok(())
}
