//! CLI subcommand definitions
//!
//! One command per step of the modeling workflow.

use std::path::PathBuf;

use clap::Subcommand;

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List model-run folders, newest first
    Runs,
    /// Show diagnostic charts and model candidates of a run
    Charts {
        /// Run label or folder name (default: selected run, else latest)
        run: Option<String>,
    },
    /// Select a run folder and optionally a model from it
    Select {
        /// Run label or folder name
        run: String,
        /// Model id (candidate image name without extension)
        #[arg(long, value_name = "ID")]
        model: Option<String>,
    },
    /// Validate a CSV or Excel upload and optionally continue to hyperparameters
    Upload {
        file: PathBuf,
        /// Country to model (default: first country in the upload)
        #[arg(long)]
        country: Option<String>,
        /// Store the country and move to the hyperparameter page
        #[arg(long)]
        proceed: bool,
    },
    /// Show or change hyperparameter ranges and model settings
    Hyperparams {
        /// Override a range, e.g. sp_auto.alphas=0.5:2.5
        #[arg(long = "set", value_name = "AD_TYPE.PARAM=MIN:MAX")]
        set: Vec<String>,
        /// Iterations (2000-10000, steps of 100)
        #[arg(long)]
        iterations: Option<u32>,
        /// Trials (5-30)
        #[arg(long)]
        trials: Option<u32>,
        /// Enable time-series validation (--ts-validation=false disables it)
        #[arg(
            long,
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = "true",
            value_name = "BOOL"
        )]
        ts_validation: Option<bool>,
        /// Write hyperparameter_config.csv and model_params.csv
        #[arg(long)]
        save: bool,
    },
    /// Print illustrative adstock and response curves for an ad type
    Curves {
        ad_type: String,
    },
    /// Write allocation parameters and run the budget allocator
    Allocate {
        /// Total budget
        #[arg(long)]
        budget: Option<u64>,
        /// Start of the date range (YYYYMMDD or YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End of the date range (YYYYMMDD or YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Channel constraint, e.g. sp_auto_cost=1.0:2.5
        #[arg(long = "constraint", value_name = "CHANNEL=LOWER:UPPER")]
        constraints: Vec<String>,
        /// Folder the allocator writes its plots to
        #[arg(long)]
        plot_folder: Option<String>,
        /// Tell the allocator not to export its results
        #[arg(long)]
        no_export: bool,
        /// Only write the parameter files
        #[arg(long)]
        skip_run: bool,
    },
    /// Show allocation results of the selected run
    Results,
    /// Inspect or navigate the session
    Session {
        #[command(subcommand)]
        command: Option<SessionCommands>,
    },
}

/// Session subcommands
#[derive(Subcommand, Clone)]
pub(crate) enum SessionCommands {
    /// Show the current page and selections (default)
    Show,
    /// Go to the next page
    Next,
    /// Go to the previous page
    Back,
    /// Set the customer
    Customer { name: String },
    /// Leave the allocation results and return to chart selection
    CloseResults,
    /// Forget everything stored for this session
    Reset,
}

impl Commands {
    /// Whether the command may change session state
    pub(crate) fn mutates_session(&self) -> bool {
        match self {
            Commands::Runs | Commands::Charts { .. } | Commands::Curves { .. } => false,
            Commands::Results => false,
            Commands::Upload { proceed, .. } => *proceed,
            Commands::Select { .. } | Commands::Hyperparams { .. } | Commands::Allocate { .. } => {
                true
            }
            Commands::Session { command } => !matches!(
                command,
                None | Some(SessionCommands::Show) | Some(SessionCommands::Reset)
            ),
        }
    }
}
