//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bintree/bintree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `BINTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::arena::DEFAULT_MAX_DEPTH;
use crate::errors::{TreeError, TreeResult};
use crate::traverse::Order;

pub const ENV_PREFIX: &str = "BINTREE";

/// Unified configuration for bintree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Slot bound for engine-allocated trees, `None` for unbounded
    pub capacity: Option<usize>,
    /// Deepest tree the recursive operations accept
    pub max_depth: usize,
    /// Default walk order of the `walk` command
    pub order: Order,
    /// Label rendered for empty payloads and holes
    pub empty_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capacity: None,
            max_depth: DEFAULT_MAX_DEPTH,
            order: Order::Pre,
            empty_label: "·".into(),
        }
    }
}

/// Get the XDG config directory for bintree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bintree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bintree.toml"))
}

impl Settings {
    /// Load settings with layered precedence, env vars read from `BINTREE_*`.
    pub fn load(config_file: Option<&Path>) -> TreeResult<Self> {
        Self::load_with_prefix(config_file, ENV_PREFIX)
    }

    /// Same as [`Settings::load`] with a custom environment prefix, e.g.
    /// `PREFIX_MAX_DEPTH=64`.
    pub fn load_with_prefix(config_file: Option<&Path>, env_prefix: &str) -> TreeResult<Self> {
        let global = global_config_path();
        Self::load_layers(global.as_deref(), config_file, env_prefix)
    }

    /// Layers `global_file`, `config_file` and the `env_prefix` environment
    /// over the defaults. `None` skips a file layer.
    ///
    /// A missing global file is skipped, a missing explicit file is an error.
    #[instrument(level = "debug")]
    pub fn load_layers(
        global_file: Option<&Path>,
        config_file: Option<&Path>,
        env_prefix: &str,
    ) -> TreeResult<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_file {
            debug!("Global config candidate: {}", global_path.display());
            builder = builder.add_source(File::from(global_path).required(false));
        }
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(env_prefix).try_parsing(true));

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    fn validate(&self) -> TreeResult<()> {
        if self.max_depth == 0 {
            return Err(TreeError::InvalidArgument(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
