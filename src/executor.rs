//! Applies computed mutations to the tracker.

use color_eyre::eyre::{Result, WrapErr};

use crate::{
	github::IssueTracker,
	reconcile::{Affected, Mutation},
};

/// Apply every mutation in order. In `dry_run` mode only logs what would happen.
///
/// Stops at the first failing call.
pub async fn apply(tracker: &dyn IssueTracker, affected: &Affected, dry_run: bool) -> Result<()> {
	for (issue_number, mutation) in affected.iter() {
		if dry_run {
			tracing::info!(issue_number, kind = %mutation.kind(), "[dry-run] skipping mutation");
			continue;
		}

		tracing::info!(issue_number, kind = %mutation.kind(), "applying mutation");
		apply_one(tracker, issue_number, mutation)
			.await
			.wrap_err_with(|| format!("Failed to {} the bot comment on #{issue_number}", mutation.kind()))?;
	}
	Ok(())
}

async fn apply_one(tracker: &dyn IssueTracker, issue_number: u64, mutation: &Mutation) -> Result<()> {
	match mutation {
		Mutation::Create { body } => tracker.create_comment(issue_number, body).await,
		Mutation::Edit { comment, body } => tracker.update_comment(comment.id, body).await,
		Mutation::Delete { comment, recreate } => {
			tracker.delete_comment(comment.id).await?;
			if let Some(body) = recreate {
				tracker.create_comment(issue_number, body).await?;
			}
			Ok(())
		}
	}
}
