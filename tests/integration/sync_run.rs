//! Full runs through `sync::run`: scanning, reconciling and applying against the mock.

use rstest::rstest;
use todo_backlinks::{BOT_SIGNATURE, IssueStatus, WARN_SENTINEL, mock_github::MockGitHubClient, sync};

use crate::common::{FakeScanner, body, mock, settings};

#[rstest]
#[tokio::test]
async fn test_run_creates_comment_and_second_run_is_noop(mock: MockGitHubClient) {
	let lines = ["myfile.py:123: TODO(#1): fix it", "foo/bar.py:5: TODO(#1): just do it"];
	mock.add_issue(1, IssueStatus::Open);
	let scanner = FakeScanner::new(&lines);

	let affected = sync::run(&settings(false, None), &mock, &scanner).await.unwrap();
	assert_eq!(affected.issue_numbers(), vec![1]);
	assert_eq!(mock.comment_bodies(1), vec![body(&lines, 1, false)]);

	mock.clear_call_log();
	let affected = sync::run(&settings(false, None), &mock, &scanner).await.unwrap();
	assert!(affected.is_empty());
	assert!(mock.write_calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_run_closed_issue_recreates_with_warning_once(mock: MockGitHubClient) {
	let lines = ["myfile.py:123: TODO(#1): fix it"];
	mock.add_issue(1, IssueStatus::Closed);
	let old_id = mock.add_comment(1, &body(&lines, 1, false));
	let scanner = FakeScanner::new(&lines);

	let affected = sync::run(&settings(false, None), &mock, &scanner).await.unwrap();
	assert_eq!(affected.issue_numbers(), vec![1]);
	insta::assert_debug_snapshot!(mock.write_calls(), @r#"
	[
	    "delete_comment(5000)",
	    "create_comment(1)",
	]
	"#);
	assert_eq!(old_id, 5000);

	let bodies = mock.comment_bodies(1);
	assert_eq!(bodies.len(), 1);
	assert!(bodies[0].contains(WARN_SENTINEL));
	assert!(bodies[0].ends_with(BOT_SIGNATURE));

	mock.clear_call_log();
	let affected = sync::run(&settings(false, None), &mock, &scanner).await.unwrap();
	assert!(affected.is_empty());
	assert!(mock.write_calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_run_orphan_deleted_once(mock: MockGitHubClient) {
	mock.add_issue(4, IssueStatus::Open);
	mock.add_comment(4, "a human comment");
	mock.add_comment(4, &format!("old list\n\n{BOT_SIGNATURE}"));
	let scanner = FakeScanner::new(&[]);

	let affected = sync::run(&settings(false, None), &mock, &scanner).await.unwrap();
	assert_eq!(affected.issue_numbers(), vec![4]);
	assert_eq!(mock.comment_bodies(4), vec!["a human comment".to_string()]);

	mock.clear_call_log();
	let affected = sync::run(&settings(false, None), &mock, &scanner).await.unwrap();
	assert!(affected.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_run_writes_affected_issues_output(mock: MockGitHubClient) {
	mock.add_issue(2, IssueStatus::Open);
	mock.add_issue(4, IssueStatus::Open);
	mock.add_comment(4, &format!("old list\n\n{BOT_SIGNATURE}"));
	let scanner = FakeScanner::new(&["src/lib.rs:10: TODO(#2): handle errors"]);

	let dir = tempfile::tempdir().unwrap();
	let output = dir.path().join("github_output");

	let affected = sync::run(&settings(false, Some(output.clone())), &mock, &scanner).await.unwrap();
	assert_eq!(affected.issue_numbers(), vec![2, 4]);
	assert_eq!(std::fs::read_to_string(&output).unwrap(), "affected-issues=2,4\n");
}

#[rstest]
#[tokio::test]
async fn test_dry_run_makes_no_writes(mock: MockGitHubClient) {
	mock.add_issue(2, IssueStatus::Open);
	mock.add_issue(4, IssueStatus::Open);
	mock.add_comment(4, &format!("old list\n\n{BOT_SIGNATURE}"));
	let scanner = FakeScanner::new(&["src/lib.rs:10: TODO(#2): handle errors"]);

	let dir = tempfile::tempdir().unwrap();
	let output = dir.path().join("github_output");

	let affected = sync::run(&settings(true, Some(output.clone())), &mock, &scanner).await.unwrap();
	assert_eq!(affected.issue_numbers(), vec![2, 4]);
	assert!(mock.write_calls().is_empty());
	assert!(mock.comment_bodies(2).is_empty());
	assert_eq!(mock.comment_bodies(4).len(), 1);
	assert_eq!(std::fs::read_to_string(&output).unwrap(), "affected-issues=2,4\n");
}

#[rstest]
#[tokio::test]
async fn test_listing_failure_aborts_before_any_write(mock: MockGitHubClient) {
	mock.add_issue(1, IssueStatus::Open);
	mock.fail_next("list_open_issues");
	let scanner = FakeScanner::new(&["myfile.py:123: TODO(#1): fix it"]);

	let dir = tempfile::tempdir().unwrap();
	let output = dir.path().join("github_output");

	let result = sync::run(&settings(false, Some(output.clone())), &mock, &scanner).await;
	assert!(result.is_err());
	assert!(mock.write_calls().is_empty());
	assert!(!output.exists());
}

#[rstest]
#[tokio::test]
async fn test_malformed_search_line_aborts(mock: MockGitHubClient) {
	let scanner = FakeScanner::new(&["myfile.py:abc: TODO(#1): fix it"]);

	let err = sync::run(&settings(false, None), &mock, &scanner).await.unwrap_err();
	assert!(format!("{err:?}").contains("abc"));
	assert!(mock.get_call_log().is_empty());
}
