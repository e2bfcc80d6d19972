//! One full run: scan, parse, reconcile, apply, report.

use color_eyre::eyre::{Result, eyre};
use tracing::instrument;

use crate::{
	config::Settings,
	executor,
	github::IssueTracker,
	index::MarkerIndex,
	marker::parse_matches,
	output::{affected_issues_line, append_output},
	reconcile::{Affected, reconcile},
	render::CommentRenderer,
	scanner::SourceScanner,
};

/// Bring the tracker in line with the TODOs in the source tree.
///
/// Mutations are only applied once all of them have been computed, so a failure while
/// reading tracker state leaves the tracker untouched.
#[instrument(skip_all, fields(repository = %settings.repository, dry_run = settings.dry_run))]
pub async fn run(settings: &Settings, tracker: &dyn IssueTracker, scanner: &dyn SourceScanner) -> Result<Affected> {
	let search_output = scanner.scan()?;
	let markers = parse_matches(&search_output).map_err(|e| eyre!("{:?}", miette::Report::new(e)))?;
	let index = MarkerIndex::from_markers(markers);
	tracing::info!(issues = index.len(), "collected TODO markers");

	let renderer = CommentRenderer::from(settings);
	let affected = reconcile(tracker, &renderer, &index).await?;
	executor::apply(tracker, &affected, settings.dry_run).await?;

	if let Some(path) = &settings.output_file {
		append_output(path, &affected_issues_line(&affected))?;
	}
	Ok(affected)
}
