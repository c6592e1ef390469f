//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};

use super::commands::Commands;

const DEFAULT_RUNS_ROOT: &str = "runs";
const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "mmmdash")]
#[command(
    about = "Marketing-mix-modeling workflow: validate uploads, tune hyperparameters, browse runs, allocate budget",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Session id; each id keeps its own page and selections
    #[arg(long, global = true, default_value = DEFAULT_SESSION, value_name = "ID")]
    pub(crate) session: String,

    /// Folder holding the model-run output folders
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) root: Option<PathBuf>,

    /// Where allocation parameters are written and the allocator runs
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) output_dir: Option<PathBuf>,

    /// Where hyperparameter and model settings CSVs are written
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) hyperparameter_dir: Option<PathBuf>,

    /// Where session state is stored (default: ~/.cache/mmmdash/sessions)
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) state_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if let Some(color) = config.color
            && matches!(self.color, ColorMode::Auto)
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        // Path options: only apply if CLI didn't set them
        if self.root.is_none() {
            self.root = config.runs_root.clone();
        }
        if self.output_dir.is_none() {
            self.output_dir = config.output_dir.clone();
        }
        if self.hyperparameter_dir.is_none() {
            self.hyperparameter_dir = config.hyperparameter_dir.clone();
        }
        if self.state_dir.is_none() {
            self.state_dir = config.state_dir.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn runs_root(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RUNS_ROOT))
    }

    pub(crate) fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub(crate) fn hyperparameter_dir(&self) -> PathBuf {
        self.hyperparameter_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_fills_unset_paths_only() {
        let cli = Cli::parse_from(["mmmdash", "--root", "cli_runs", "runs"]);
        let config: Config = toml::from_str(
            r#"
            runs_root = "config_runs"
            output_dir = "config_out"
            no_color = true
            color = "always"
            "#,
        )
        .unwrap();
        let cli = cli.with_config(&config);
        assert_eq!(cli.runs_root(), PathBuf::from("cli_runs"));
        assert_eq!(cli.output_dir(), PathBuf::from("config_out"));
        assert_eq!(cli.hyperparameter_dir(), PathBuf::from("."));
        assert_eq!(cli.color, ColorMode::Always);
        assert!(!cli.use_color());
    }

    #[test]
    fn defaults_without_config() {
        let cli = Cli::parse_from(["mmmdash"]).with_config(&Config::default());
        assert_eq!(cli.session, "default");
        assert_eq!(cli.runs_root(), PathBuf::from("runs"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["mmmdash", "session", "show", "--session", "acme", "--json"]);
        assert_eq!(cli.session, "acme");
        assert!(cli.json);
    }
}
