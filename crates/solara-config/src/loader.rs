// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./solara.toml` > `~/.config/solara/solara.toml` >
//! `/etc/solara/solara.toml`, with `SOLARA_` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SolaraConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/solara/solara.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/solara/solara.toml`
/// 3. `~/.config/solara/solara.toml`
/// 4. `./solara.toml`
/// 5. `SOLARA_*` environment variables
pub fn load_config() -> Result<SolaraConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SolaraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SolaraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SolaraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SolaraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SolaraConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("solara/solara.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("solara.toml"))
        .merge(env_provider())
}

/// Maps `SOLARA_SECTION_KEY` onto `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys themselves
/// contain underscores: `SOLARA_BACKEND_API_BASE_URL` must become
/// `backend.api_base_url`, not `backend.api.base.url`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("SOLARA_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: &[&str] = &["app", "speech", "dialogue", "storage", "backend"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("backend_api_base_url"), "backend.api_base_url");
        assert_eq!(map_env_key("speech_cloud_enabled"), "speech.cloud_enabled");
        assert_eq!(
            map_env_key("dialogue_max_no_speech_retries"),
            "dialogue.max_no_speech_retries"
        );
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }
}
