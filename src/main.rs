use clap::Parser;
use color_eyre::eyre::Result;
use todo_backlinks::{ConfigArgs, GitGrepScanner, Settings, github, logging, output::affected_issues_line, sync};

/// Sync `TODO(#N): message` markers in the source tree to one bot comment per referenced issue.
#[derive(Parser)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
struct Cli {
	#[command(flatten)]
	config: ConfigArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;
	let cli = Cli::parse();
	logging::init()?;

	let settings = Settings::try_from(cli.config)?;
	let tracker = github::create_client(&settings);
	let scanner = GitGrepScanner::new(settings.root.clone(), settings.path_filter.clone());

	let affected = sync::run(&settings, tracker.as_ref(), &scanner).await?;
	println!("{}", affected_issues_line(&affected));
	Ok(())
}
