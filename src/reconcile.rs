//! Reconciliation of source TODOs against the bot comments on the tracker.
//!
//! Three passes run in a fixed order over one owned [`Affected`] accumulator:
//! 1. closed issues that still have TODOs get their comment recreated with a warning
//! 2. missing or stale comments get created or edited
//! 3. open issues no longer referenced by any TODO lose their bot comment
//!
//! An issue touched by an earlier pass is never revisited by a later one, so every
//! issue ends up with at most one mutation.

use color_eyre::eyre::Result;
use tracing::instrument;

use crate::{
	github::IssueTracker,
	index::MarkerIndex,
	issue_state::{Comment, fetch_issue_state, find_bot_comment},
	render::CommentRenderer,
};

/// A single change to apply to one issue's bot comment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mutation {
	Create { body: String },
	Edit { comment: Comment, body: String },
	/// With `recreate` set, a fresh comment is posted after the deletion so subscribers get notified again
	Delete { comment: Comment, recreate: Option<String> },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, derive_more::Display)]
pub enum MutationKind {
	#[display("create")]
	Create,
	#[display("edit")]
	Edit,
	#[display("delete")]
	Delete,
	#[display("recreate")]
	Recreate,
}

impl Mutation {
	pub fn kind(&self) -> MutationKind {
		match self {
			Mutation::Create { .. } => MutationKind::Create,
			Mutation::Edit { .. } => MutationKind::Edit,
			Mutation::Delete { recreate: None, .. } => MutationKind::Delete,
			Mutation::Delete { recreate: Some(_), .. } => MutationKind::Recreate,
		}
	}

	/// Body the issue's bot comment will have once this is applied, if any
	pub fn new_body(&self) -> Option<&str> {
		match self {
			Mutation::Create { body } | Mutation::Edit { body, .. } => Some(body),
			Mutation::Delete { recreate, .. } => recreate.as_deref(),
		}
	}
}

/// Issues this run touches, in the order they were decided.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Affected(Vec<(u64, Mutation)>);

impl Affected {
	pub fn contains(&self, issue_number: u64) -> bool {
		self.0.iter().any(|(n, _)| *n == issue_number)
	}

	/// Record a mutation. Refused (returns `false`) if the issue already has one.
	pub fn insert(&mut self, issue_number: u64, mutation: Mutation) -> bool {
		if self.contains(issue_number) {
			return false;
		}
		self.0.push((issue_number, mutation));
		true
	}

	pub fn get(&self, issue_number: u64) -> Option<&Mutation> {
		self.0.iter().find(|(n, _)| *n == issue_number).map(|(_, m)| m)
	}

	pub fn issue_numbers(&self) -> Vec<u64> {
		self.0.iter().map(|(n, _)| *n).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = (u64, &Mutation)> {
		self.0.iter().map(|(n, m)| (*n, m))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

pub struct Reconciler<'a> {
	tracker: &'a dyn IssueTracker,
	renderer: &'a CommentRenderer,
}

impl<'a> Reconciler<'a> {
	pub fn new(tracker: &'a dyn IssueTracker, renderer: &'a CommentRenderer) -> Self {
		Self { tracker, renderer }
	}

	/// Compute every mutation needed for the tracker to match `index`. Touches nothing.
	///
	/// Any tracker error aborts the whole computation.
	pub async fn reconcile(&self, index: &MarkerIndex) -> Result<Affected> {
		let affected = Affected::default();
		let affected = self.recreate_closed_with_todos(index, affected).await?;
		let affected = self.sync_stale_comments(index, affected).await?;
		let affected = self.delete_orphaned_comments(index, affected).await?;

		tracing::info!(affected = ?affected.issue_numbers(), "reconciliation finished");
		Ok(affected)
	}

	/// Pass 1: a closed issue whose bot comment lacks the warning gets it deleted and reposted with the warning.
	#[instrument(skip_all)]
	async fn recreate_closed_with_todos(&self, index: &MarkerIndex, mut affected: Affected) -> Result<Affected> {
		for (issue_number, group) in index.iter() {
			let state = fetch_issue_state(self.tracker, issue_number).await?;
			if !state.exists {
				tracing::warn!(issue_number, todos = group.len(), "TODOs reference an issue that does not exist, skipping");
				continue;
			}
			if state.open {
				continue;
			}
			let Some(comment) = state.bot_comment else {
				continue;
			};
			if comment.contains_warn_sentinel() {
				continue;
			}

			tracing::info!(issue_number, todos = group.len(), "issue was closed with outstanding TODOs");
			let body = self.renderer.render(group, true);
			affected.insert(issue_number, Mutation::Delete { comment, recreate: Some(body) });
		}
		Ok(affected)
	}

	/// Pass 2: create missing comments, edit ones whose body drifted from the source.
	#[instrument(skip_all)]
	async fn sync_stale_comments(&self, index: &MarkerIndex, mut affected: Affected) -> Result<Affected> {
		for (issue_number, group) in index.iter() {
			if affected.contains(issue_number) {
				continue;
			}

			let state = fetch_issue_state(self.tracker, issue_number).await?;
			if !state.exists {
				tracing::debug!(issue_number, "issue does not exist, skipping");
				continue;
			}

			// Keep the closed-issue framing once a comment has it
			let warn_closed = state.bot_comment.as_ref().is_some_and(Comment::contains_warn_sentinel);
			let body = self.renderer.render(group, warn_closed);

			let mutation = match state.bot_comment {
				None => Mutation::Create { body },
				Some(comment) if comment.body != body => Mutation::Edit { comment, body },
				Some(_) => {
					tracing::debug!(issue_number, "bot comment is up to date");
					continue;
				}
			};
			tracing::debug!(issue_number, kind = %mutation.kind(), "comment out of sync");
			affected.insert(issue_number, mutation);
		}
		Ok(affected)
	}

	/// Pass 3: open issues no TODO references anymore shouldn't keep a bot comment.
	///
	/// Lists every open issue and fetches comments for each unreferenced one, so it dominates the run's API cost.
	#[instrument(skip_all)]
	async fn delete_orphaned_comments(&self, index: &MarkerIndex, mut affected: Affected) -> Result<Affected> {
		for issue in self.tracker.list_open_issues().await? {
			if affected.contains(issue.number) || index.contains(issue.number) {
				continue;
			}

			let comments = self.tracker.fetch_comments(issue.number).await?;
			if let Some(comment) = find_bot_comment(&comments) {
				tracing::info!(issue_number = issue.number, "no TODOs reference this issue anymore");
				affected.insert(issue.number, Mutation::Delete { comment, recreate: None });
			}
		}
		Ok(affected)
	}
}

/// Shorthand for [`Reconciler::reconcile`].
pub async fn reconcile(tracker: &dyn IssueTracker, renderer: &CommentRenderer, index: &MarkerIndex) -> Result<Affected> {
	Reconciler::new(tracker, renderer).reconcile(index).await
}
