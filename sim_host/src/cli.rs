use crate::config::HostConfig;
use clap::Parser;
use std::path::PathBuf;

/// Headless self-training Pong
#[derive(Parser, Debug)]
#[command(name = "pong_trainer")]
#[command(about = "Run the Pong simulation whose left paddle learns from every rally")]
pub struct Args {
    /// TOML host config; defaults apply to anything it leaves out
    pub config: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Start in quiet (fast-forward) mode
    #[arg(short, long)]
    pub quiet: bool,

    /// Seed for the shared game rng
    #[arg(long)]
    pub seed: Option<u64>,

    /// Training sample file
    #[arg(long)]
    pub corpus: Option<PathBuf>,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied
    pub fn host_config(&self) -> anyhow::Result<HostConfig> {
        let mut config = match &self.config {
            Some(path) => HostConfig::load(path)?,
            None => HostConfig::default(),
        };
        if self.ticks.is_some() {
            config.tick_limit = self.ticks;
        }
        if self.quiet {
            config.fast_forward = true;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(corpus) = &self.corpus {
            config.corpus_path = Some(corpus.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_help_is_not_a_config_path() {
        let err = Args::try_parse_from(["pong_trainer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_no_arguments_uses_defaults() {
        let args = Args::try_parse_from(["pong_trainer"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.host_config().unwrap(), HostConfig::default());
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.toml");
        std::fs::write(&path, "tick_limit = 10\nseed = 1\n").unwrap();

        let path_arg = path.to_string_lossy().into_owned();

        let args = Args::try_parse_from([
            "pong_trainer",
            path_arg.as_str(),
            "--ticks",
            "500",
            "-q",
            "--corpus",
            "/tmp/rally.txt",
        ])
        .unwrap();
        let config = args.host_config().unwrap();

        assert_eq!(config.tick_limit, Some(500));
        assert!(config.fast_forward);
        assert_eq!(config.seed, 1, "Unset flags keep the file's value");
        assert_eq!(config.corpus_path, Some(PathBuf::from("/tmp/rally.txt")));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Args::try_parse_from(["pong_trainer", "--speed", "5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::try_parse_from(["pong_trainer", "/nonexistent/host.toml"]).unwrap();
        let err = args.host_config().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config"), "{err:#}");
    }
}
