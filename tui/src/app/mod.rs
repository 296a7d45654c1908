pub mod plain;
pub mod run;

use std::{env, fs::File, path::PathBuf};

use anyhow::{bail, Context, Result};
use env_logger::{Env, Target};
use monitor::config::MonitorConfig;
use tokio::runtime::Runtime;

const LOG_FILE_VAR: &str = "FLINT_DASH_LOG";
const DEFAULT_LOG_FILE: &str = "flint-dash.log";

/// Command line of the dashboard.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// Log progress lines instead of drawing the terminal UI.
    pub plain: bool,
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parses `[--plain] [config.json]`.
    ///
    /// # Errors
    /// Returns an error on unknown flags or more than one config path.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        for arg in args {
            match arg.as_str() {
                "--plain" => parsed.plain = true,
                flag if flag.starts_with("--") => bail!("unknown flag: {flag}"),
                path => {
                    if parsed.config.is_some() {
                        bail!("expected at most one config file, got another: {path}");
                    }
                    parsed.config = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }

    /// Loads the config file if one was given, then applies `HOST` / `PORT`.
    pub fn config(&self) -> Result<MonitorConfig> {
        let config = match &self.config {
            Some(path) => MonitorConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => MonitorConfig::default(),
        };
        Ok(config.with_env()?)
    }
}

/// Initialises logging.
///
/// The terminal UI owns stderr, so unless `to_stderr` is set logs go to the file
/// named by `FLINT_DASH_LOG`.
pub fn init_logging(to_stderr: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if !to_stderr {
        let path = env::var(LOG_FILE_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

/// The runtime the poller and command requests run on.
pub fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("starting tokio runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flag_and_path() {
        let args = parse(&["--plain", "dash.json"]).unwrap();
        assert!(args.plain);
        assert_eq!(args.config, Some(PathBuf::from("dash.json")));

        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn rejects_unknown_flags_and_extra_paths() {
        assert!(parse(&["--fast"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
