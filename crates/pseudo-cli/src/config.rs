mod defaults;
mod file;

use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use directories::ProjectDirs;
use file::FileConfig;
use pseudofam::core::models::pseudo::PseudoType;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings every command runs with, after merging flags, file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub store_path: PathBuf,
    pub default_pseudo_type: PseudoType,
}

impl ResolvedConfig {
    /// Picks the pseudo type for a command: the flag if given, else the default.
    pub fn pseudo_type_or_default(&self, flag: Option<&str>) -> Result<PseudoType> {
        match flag {
            Some(name) => parse_pseudo_type(name).map_err(CliError::Argument),
            None => Ok(self.default_pseudo_type),
        }
    }
}

fn parse_pseudo_type(name: &str) -> std::result::Result<PseudoType, String> {
    name.parse().map_err(|_| {
        format!("unknown pseudo type `{name}`; expected one of `pseudo`, `pseudo.upf`, `pseudo.vps`")
    })
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "pseudofam", "pseudofam")
}

/// Resolves the configuration with precedence flag > file > default.
///
/// An explicit `--config` path must exist; the per-user config file is only
/// read if present.
pub fn resolve(config_flag: Option<&Path>, store_flag: Option<PathBuf>) -> Result<ResolvedConfig> {
    let defaults = DefaultsConfig::default();
    let dirs = project_dirs();

    let file_config = match config_flag {
        Some(path) => FileConfig::load(path)?,
        None => match dirs
            .as_ref()
            .map(|d| d.config_dir().join(defaults.config_filename))
        {
            Some(path) if path.is_file() => FileConfig::load(&path)?,
            _ => FileConfig::default(),
        },
    };
    debug!("File configuration: {:?}", &file_config);

    merge(file_config, store_flag, dirs.as_ref(), &defaults)
}

fn merge(
    file_config: FileConfig,
    store_flag: Option<PathBuf>,
    dirs: Option<&ProjectDirs>,
    defaults: &DefaultsConfig,
) -> Result<ResolvedConfig> {
    let store_path = store_flag
        .or(file_config.store.path)
        .or_else(|| dirs.map(|d| d.data_dir().join(defaults.store_dirname)))
        .ok_or_else(|| {
            CliError::Config(
                "no store directory configured and no home directory found; pass --store".into(),
            )
        })?;

    let type_name = file_config
        .family
        .default_pseudo_type
        .unwrap_or_else(|| defaults.pseudo_type.to_string());
    let default_pseudo_type = parse_pseudo_type(&type_name).map_err(CliError::Config)?;

    Ok(ResolvedConfig {
        store_path,
        default_pseudo_type,
    })
}
