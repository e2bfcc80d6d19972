//! Finding TODO markers in the source tree.

use std::{
	path::{Path, PathBuf},
	process::Command,
};

use color_eyre::eyre::{Result, WrapErr, bail};

/// Extended regex handed to `git grep`. The trailing `\S` keeps bare `TODO(#N):` lines out of the results.
pub const MARKER_PATTERN: &str = r"TODO\(#[0-9]+\): *[^[:space:]]";

/// Anything that can produce `<path>:<line>:<matched text>` lines.
pub trait SourceScanner {
	fn scan(&self) -> Result<String>;
}

/// Runs `git grep` over a checkout.
#[derive(Clone, Debug, derive_new::new)]
pub struct GitGrepScanner {
	root: PathBuf,
	/// Pathspec restricting the search, e.g. `src/`
	path_filter: Option<String>,
}

impl GitGrepScanner {
	fn args(&self) -> Vec<&str> {
		// `-I`: a binary match would print `Binary file <path> matches`, which isn't a `path:line:text` line
		let mut args = vec!["grep", "-I", "-n", "--no-color", "-E", MARKER_PATTERN];
		if let Some(filter) = &self.path_filter {
			args.extend(["--", filter.as_str()]);
		}
		args
	}
}

impl SourceScanner for GitGrepScanner {
	fn scan(&self) -> Result<String> {
		tracing::debug!(root = %self.root.display(), filter = ?self.path_filter, "scanning for TODO markers");
		git(&self.args(), &self.root)
	}
}

/// Run git with the given arguments, treating grep's "no matches" exit code as empty output.
fn git(args: &[&str], dir: &Path) -> Result<String> {
	let output = Command::new("git")
		.args(args)
		.current_dir(dir)
		.output()
		.wrap_err_with(|| format!("Failed to run git in {}", dir.display()))?;

	match output.status.code() {
		Some(0) => Ok(String::from_utf8(output.stdout)?),
		Some(1) if output.stderr.is_empty() => Ok(String::new()), // No matches
		_ => bail!("git {} failed: {}", args.join(" "), String::from_utf8_lossy(&output.stderr)),
	}
}
