use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    /// Folder holding the model-run output folders
    #[serde(default)]
    pub(crate) runs_root: Option<PathBuf>,
    /// Where allocation_params.json and budget_params.csv are written
    #[serde(default)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Where hyperparameter_config.csv and model_params.csv are written
    #[serde(default)]
    pub(crate) hyperparameter_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) state_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) allocator_command: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) customers: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    /// File the values came from; logged once tracing is up
    #[serde(skip)]
    pub(crate) path: Option<PathBuf>,
}

impl Config {
    pub(crate) fn load() -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(mut config) => {
                        config.path = Some(path);
                        return config;
                    }
                    Err(e) => {
                        // Read before logging is configured
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        // 1. Project-local: ./mmmdash.toml
        let mut paths = vec![PathBuf::from("mmmdash.toml")];

        // 2. XDG config: ~/.config/mmmdash/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("mmmdash").join("config.toml"));
        }

        // 3. macOS Application Support: ~/Library/Application Support/mmmdash/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let macos_path = config_dir.join("mmmdash").join("config.toml");
            if !paths.contains(&macos_path) {
                paths.push(macos_path);
            }
        }

        // 4. Home directory: ~/.mmmdash.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".mmmdash.toml"));
        }

        paths
    }
}
