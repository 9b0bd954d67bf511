// src/config/mod.rs
pub mod consts;
pub mod options;
pub mod state;

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::Result;
use consts::{CONFIG_FILE, ENV_PREFIX};
use options::AppOptions;

/// Layered options: built-in defaults, then the TOML file, then
/// `SONAA_*` environment variables (`SONAA_SCRAPE__WORKERS=8`).
///
/// With no explicit path, `sonaa.toml` in the working directory is used
/// when present.
pub fn load(path: Option<&Path>) -> Result<AppOptions> {
    let mut figment = Figment::from(Serialized::defaults(AppOptions::default()));

    match path {
        Some(p) => figment = figment.merge(Toml::file(p)),
        None => {
            let local = Path::new(CONFIG_FILE);
            if local.exists() {
                figment = figment.merge(Toml::file(local));
            }
        }
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let options: AppOptions = figment.extract().map_err(Box::new)?;
    logd!("Config: loaded (data_dir={})", options.paths.data_dir.display());
    Ok(options)
}
