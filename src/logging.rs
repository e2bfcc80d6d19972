//! Tracing setup.
//!
//! Filtering comes from `RUST_LOG`, falling back to the directives embedded at build time
//! (`.cargo/log_directives`, see `build.rs`), then to `info`.
//! With `TODO_BACKLINKS_TRACE_FILE` set, events go to that file as JSON lines instead of stderr.

use std::{fs::OpenOptions, sync::Mutex};

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const TRACE_FILE_ENV: &str = "TODO_BACKLINKS_TRACE_FILE";

fn default_directives() -> &'static str {
	option_env!("LOG_DIRECTIVES").unwrap_or("info")
}

pub fn init() -> Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()));
	let registry = tracing_subscriber::registry().with(filter);

	match std::env::var_os(TRACE_FILE_ENV) {
		Some(path) => {
			let file = OpenOptions::new()
				.create(true)
				.append(true)
				.open(&path)
				.wrap_err_with(|| format!("Failed to open trace file {}", path.to_string_lossy()))?;
			registry.with(fmt::layer().json().with_writer(Mutex::new(file))).try_init()?;
		}
		None => registry.with(fmt::layer().with_writer(std::io::stderr).with_target(false)).try_init()?,
	}
	Ok(())
}
