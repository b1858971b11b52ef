//! Configuration management for sh4-emu.
//!
//! Settings are loaded from multiple sources in priority order:
//! 1. Environment variables (SH4EMU_FULL_MMU, SH4EMU_HOST_FPU)
//! 2. Project-local config file (`./sh4-emu.toml`)
//! 3. User config file (`~/.config/sh4-emu/config.toml`)
//! 4. Built-in defaults
//!
//! # Config File Format
//!
//! ```toml
//! # sh4-emu.toml
//!
//! # Full MMU emulation (required for TLB exception delivery and for
//! # the FPU-disable fault path)
//! full_mmu = true
//!
//! # Propagate the emulated rounding mode into the host FPU
//! host_fpu = true
//! ```
//!
//! Core entry points that depend on a setting take `&Settings` explicitly
//! so that both MMU configurations can be exercised in unit tests; the
//! cached [`Settings::get`] is for the embedding frontend.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global cached settings.
static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Emulator core settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Full MMU emulation.
    ///
    /// TLB miss/protection exceptions and the FPU-disable fault path
    /// cannot be delivered precisely without it. Off by default because
    /// most commercial titles never enable the MMU.
    pub full_mmu: bool,

    /// Propagate the emulated FPSCR rounding/denormal mode into the host
    /// FPU control word, so host float instructions used to implement
    /// SH4 opcodes round the same way the real CPU would.
    pub host_fpu: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            full_mmu: false,
            host_fpu: true,
        }
    }
}

/// A config-file fragment. Absent keys leave the lower-priority value
/// in place, which a plain `Settings` with defaults could not express.
#[derive(Debug, Default, Deserialize)]
struct PartialSettings {
    full_mmu: Option<bool>,
    host_fpu: Option<bool>,
}

impl Settings {
    /// Load settings from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Project-local `sh4-emu.toml`
    /// 3. User config `~/.config/sh4-emu/config.toml`
    /// 4. Defaults
    pub fn load() -> Self {
        let mut settings = Self::default();

        // User config first (lowest priority of the file sources)
        if let Some(user) = Self::load_user_config() {
            settings.merge(user);
        }

        // Project-local config (higher priority)
        if let Some(local) = Self::load_local_config() {
            settings.merge(local);
        }

        // Environment variables override everything
        settings.apply_env_overrides();

        settings
    }

    /// Get the cached global settings.
    ///
    /// Loads on first call and caches the result.
    pub fn get() -> &'static Settings {
        SETTINGS.get_or_init(|| {
            let settings = Self::load();
            log::debug!("Loaded settings: {:?}", settings);
            settings
        })
    }

    /// Load user configuration from ~/.config/sh4-emu/config.toml
    fn load_user_config() -> Option<PartialSettings> {
        let config_dir = dirs::config_dir()?;
        let config_path = config_dir.join("sh4-emu").join("config.toml");
        Self::load_from_file(&config_path)
    }

    /// Load project-local configuration from ./sh4-emu.toml
    fn load_local_config() -> Option<PartialSettings> {
        Self::load_from_file(Path::new("sh4-emu.toml"))
    }

    /// Load a config fragment from a specific file.
    fn load_from_file(path: &Path) -> Option<PartialSettings> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(partial) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(partial)
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge a config fragment into these settings.
    /// Only keys present in the fragment override.
    fn merge(&mut self, other: PartialSettings) {
        if let Some(full_mmu) = other.full_mmu {
            self.full_mmu = full_mmu;
        }
        if let Some(host_fpu) = other.host_fpu {
            self.host_fpu = host_fpu;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_bool("SH4EMU_FULL_MMU") {
            log::info!("Using SH4EMU_FULL_MMU from environment: {}", v);
            self.full_mmu = v;
        }
        if let Some(v) = env_bool("SH4EMU_HOST_FPU") {
            log::info!("Using SH4EMU_HOST_FPU from environment: {}", v);
            self.host_fpu = v;
        }
    }

    /// Get the path to the user config file (for display/creation).
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sh4-emu").join("config.toml"))
    }

    /// Generate a sample config file content.
    pub fn sample_config() -> String {
        r#"# sh4-emu configuration
# Place this file at ~/.config/sh4-emu/config.toml or ./sh4-emu.toml

# Full MMU emulation. Needed for titles that enable the MMU; also
# required for precise FPU-disable and TLB exception delivery.
full_mmu = false

# Propagate the emulated FPSCR rounding/denormal mode into the host FPU.
host_fpu = true
"#
        .to_string()
    }
}

/// Parse a boolean environment variable.
fn env_bool(name: &str) -> Option<bool> {
    match std::env::var(name).ok()?.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            log::warn!("Ignoring unrecognized value for {}: {:?}", name, other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.full_mmu);
        assert!(settings.host_fpu);
    }

    #[test]
    fn test_merge_partial() {
        let mut base = Settings::default();

        let fragment: PartialSettings = toml::from_str("full_mmu = true").unwrap();
        base.merge(fragment);

        // full_mmu overridden, host_fpu untouched
        assert!(base.full_mmu);
        assert!(base.host_fpu);

        let fragment: PartialSettings = toml::from_str("host_fpu = false").unwrap();
        base.merge(fragment);

        assert!(base.full_mmu);
        assert!(!base.host_fpu);
    }

    #[test]
    fn test_sample_config_parses() {
        let sample = Settings::sample_config();
        let parsed: Settings = toml::from_str(&sample).expect("Sample config should parse");
        assert!(!parsed.full_mmu);
        assert!(parsed.host_fpu);
    }

    #[test]
    fn test_empty_fragment_keeps_defaults() {
        let mut base = Settings::default();
        let fragment: PartialSettings = toml::from_str("").unwrap();
        base.merge(fragment);
        assert!(!base.full_mmu);
        assert!(base.host_fpu);
    }
}
