//! Configuration for the conversion boundary layer.
//!
//! The core never reads configuration; only the external-engine glue
//! (synthesizer, OMR) needs these values.

use crate::error::TonalError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable pointing at a YAML config file.
pub const CONFIG_ENV_VAR: &str = "TONAL_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// SoundFont handed to the synthesizer for MIDI -> WAV.
    pub soundfont: PathBuf,
    /// External synthesizer binary (FluidSynth-compatible command line).
    pub synth_command: String,
    /// External OMR binary, invoked as `<cmd> <image> <output.musicxml>`.
    pub omr_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            soundfont: PathBuf::from("/usr/share/sounds/sf2/FluidR3_GM.sf2"),
            synth_command: "fluidsynth".to_string(),
            omr_command: "homr".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, TonalError> {
        let text = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&text).map_err(|e| TonalError::Config(e.to_string()))
    }

    /// Load from the file named by `TONAL_CONFIG`, or fall back to defaults.
    pub fn load() -> Result<Self, TonalError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
