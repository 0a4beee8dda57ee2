use crate::{
    error::InteropError,
    hook::Signature,
    layout::{GameVersion, Layout},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Byte signatures for the hook targets the host object model does not export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatures {
    pub setup_ornament: Signature,
    pub place_minion: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingConfig {
    /// Build of the running client.
    pub game_version: GameVersion,
    pub signatures: Signatures,
    #[serde(default)]
    pub layouts: Vec<Layout>,
}

impl ScalingConfig {
    pub fn from_toml(text: &str) -> Result<Self, InteropError> {
        toml::from_str(text).map_err(InteropError::Config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, InteropError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(InteropError::IO)?;
        Self::from_toml(&text)
    }

    /// Layout recorded for the running client build.
    pub fn layout(&self) -> Result<&Layout, InteropError> {
        self.layouts
            .iter()
            .find(|layout| layout.game_version == self.game_version)
            .ok_or_else(|| InteropError::UnknownGameVersion(self.game_version.as_str().into()))
    }
}
