// k8s-schema-fixup/src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    error::{Result, SchemaError},
    kind_enum::Strictness,
};

pub const DEFAULT_INPUT: &str = "definitions.json";
/// Picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "k8s-schema-fixup.toml";

/// Config is merged: defaults -> config file -> command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub input: PathBuf,
    pub base_uri: Option<String>,
    pub strictness: Strictness,
}

impl Default for Config {
    fn default() -> Self {
        Self { input: PathBuf::from(DEFAULT_INPUT), base_uri: None, strictness: Strictness::default() }
    }
}

/// One layer; unset fields leave the lower layer alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub input: Option<PathBuf>,
    pub base_uri: Option<String>,
    pub strictness: Option<Strictness>,
}

fn merge(a: &mut Config, b: &PartialConfig) {
    if let Some(v) = &b.input { a.input = v.clone(); }
    if b.base_uri.is_some() { a.base_uri = b.base_uri.clone(); }
    if let Some(v) = b.strictness { a.strictness = v; }
}

pub fn read_file(path: &Path) -> Result<PartialConfig> {
    let text = fs::read_to_string(path)
        .map_err(|e| SchemaError::Config { path: path.to_path_buf(), message: e.to_string() })?;
    toml::from_str(&text).map_err(|e| SchemaError::Config { path: path.to_path_buf(), message: e.to_string() })
}

/// `explicit` must exist; otherwise `<cwd>/k8s-schema-fixup.toml` is used if present.
pub fn resolve(explicit: Option<&Path>, cwd: &Path, cli: &PartialConfig) -> Result<Config> {
    let mut merged = Config::default();
    let file = match explicit {
        Some(p) => Some(read_file(p)?),
        None => {
            let implicit = cwd.join(DEFAULT_CONFIG_FILE);
            if implicit.is_file() { Some(read_file(&implicit)?) } else { None }
        }
    };
    if let Some(f) = &file { merge(&mut merged, f); }
    merge(&mut merged, cli);
    debug!(?merged, "resolved configuration");
    Ok(merged)
}
