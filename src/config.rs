//! Run configuration, read once at startup from flags or the environment.

use std::{path::PathBuf, str::FromStr};

use clap::{ArgAction, Args};
use url::Url;

use crate::render::CommentRenderer;

pub const DEFAULT_SERVER_URL: &str = "https://github.com";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const FALLBACK_BASE_REF: &str = "main";

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
	#[error("missing required setting: pass --{flag} or set {env}")]
	Missing { flag: &'static str, env: &'static str },
	#[error("repository must look like `owner/name`, got `{0}`")]
	InvalidRepository(String),
	#[error("invalid {setting} `{value}`: {source}")]
	InvalidUrl {
		setting: &'static str,
		value: String,
		#[source]
		source: url::ParseError,
	},
}

/// Raw configuration as given on the command line or in the environment.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
	/// Token used to authenticate with the tracker
	#[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
	pub token: Option<String>,

	/// Repository the issues live in, as `owner/name`
	#[arg(long, env = "GITHUB_REPOSITORY")]
	pub repository: Option<String>,

	/// Web URL of the tracker, used to build permalinks
	#[arg(long, env = "GITHUB_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
	pub server_url: String,

	/// REST API base URL
	#[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
	pub api_url: String,

	/// Ref the permalinks point at. Takes precedence over --default-branch
	#[arg(long, env = "GITHUB_BASE_REF")]
	pub base_ref: Option<String>,

	/// Fallback ref for permalinks when no base ref is given
	#[arg(long, env = "DEFAULT_BRANCH")]
	pub default_branch: Option<String>,

	/// Compute and report mutations without applying them. Only the first character counts: `t`/`T` is true
	#[arg(long, env = "INPUT_DRY_RUN", value_parser = parse_flag, action = ArgAction::Set, num_args = 0..=1, default_value = "false", default_missing_value = "true")]
	pub dry_run: bool,

	/// Pathspec restricting the TODO search
	#[arg(long, env = "INPUT_PATH_FILTER")]
	pub path_filter: Option<String>,

	/// Root of the source tree to scan
	#[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
	pub root: PathBuf,

	/// File to append the `affected-issues` output to
	#[arg(long, env = "GITHUB_OUTPUT")]
	pub output_file: Option<PathBuf>,
}

/// `owner/name`
#[derive(Clone, Debug, Eq, PartialEq, derive_more::Display)]
#[display("{owner}/{name}")]
pub struct Repository {
	pub owner: String,
	pub name: String,
}

impl FromStr for Repository {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().split_once('/') {
			Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => Ok(Self {
				owner: owner.to_string(),
				name: name.to_string(),
			}),
			_ => Err(ConfigError::InvalidRepository(s.to_string())),
		}
	}
}

/// Validated configuration, passed explicitly to everything that needs it.
#[derive(Clone, Debug)]
pub struct Settings {
	pub token: String,
	pub repository: Repository,
	pub server_url: Url,
	pub api_url: Url,
	pub base_ref: String,
	pub dry_run: bool,
	pub path_filter: Option<String>,
	pub root: PathBuf,
	pub output_file: Option<PathBuf>,
}

impl TryFrom<ConfigArgs> for Settings {
	type Error = ConfigError;

	fn try_from(args: ConfigArgs) -> Result<Self, Self::Error> {
		let token = non_empty(args.token).ok_or(ConfigError::Missing { flag: "token", env: "GITHUB_TOKEN" })?;
		let repository = non_empty(args.repository)
			.ok_or(ConfigError::Missing {
				flag: "repository",
				env: "GITHUB_REPOSITORY",
			})?
			.parse()?;

		Ok(Self {
			token,
			repository,
			server_url: parse_url("server URL", &args.server_url)?,
			api_url: parse_url("API URL", &args.api_url)?,
			base_ref: resolve_base_ref([args.base_ref.as_deref(), args.default_branch.as_deref()]),
			dry_run: args.dry_run,
			path_filter: non_empty(args.path_filter),
			root: args.root,
			output_file: args.output_file,
		})
	}
}

impl From<&Settings> for CommentRenderer {
	fn from(settings: &Settings) -> Self {
		CommentRenderer::new(settings.server_url.to_string(), settings.repository.to_string(), settings.base_ref.clone())
	}
}

/// First non-empty candidate, else [`FALLBACK_BASE_REF`].
pub fn resolve_base_ref<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
	candidates
		.into_iter()
		.flatten()
		.map(str::trim)
		.find(|candidate| !candidate.is_empty())
		.unwrap_or(FALLBACK_BASE_REF)
		.to_string()
}

/// Case-insensitive, first character decides: `true`, `T`, `tRuE` are all true. Everything else is false.
pub fn parse_flag(s: &str) -> Result<bool, String> {
	Ok(matches!(s.trim().chars().next(), Some('t' | 'T')))
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

fn parse_url(setting: &'static str, value: &str) -> Result<Url, ConfigError> {
	Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
		setting,
		value: value.to_string(),
		source,
	})
}
