//! Keep one bot comment per issue listing every `TODO(#N): message` in the source tree that references it.

pub mod config;
pub mod error;
pub mod executor;
pub mod github;
pub mod index;
pub mod issue_state;
pub mod logging;
pub mod marker;
pub mod mock_github;
pub mod output;
pub mod reconcile;
pub mod render;
pub mod scanner;
pub mod sync;

// Re-export the pieces most callers need at crate root for convenience
pub use config::{ConfigArgs, ConfigError, Settings};
pub use error::{MalformedKind, MatchError};
pub use github::{BoxedIssueTracker, IssueStatus, IssueTracker, RealGitHubClient};
pub use index::{MarkerGroup, MarkerIndex};
pub use issue_state::{Comment, IssueState};
pub use marker::{Marker, parse_matches};
pub use reconcile::{Affected, Mutation, MutationKind, Reconciler, reconcile};
pub use render::{BOT_SIGNATURE, CommentRenderer, WARN_SENTINEL};
pub use scanner::{GitGrepScanner, SourceScanner};
