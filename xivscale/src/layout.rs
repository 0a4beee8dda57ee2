use crate::error::InteropError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{ffi::c_void, fmt, mem::size_of};

lazy_static! {
    static ref GAME_VERSION_REGEX: Regex =
        Regex::new(r"^\d{4}\.\d{2}\.\d{2}\.\d{4}\.\d{4}$").unwrap();
}

/// Game build identifier as found in `ffxivgame.ver`, e.g. `2024.07.10.0001.0000`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameVersion(Box<str>);

impl GameVersion {
    pub fn parse(version: impl AsRef<str>) -> Result<Self, InteropError> {
        let version = version.as_ref().trim();
        if GAME_VERSION_REGEX.is_match(version) {
            Ok(Self(version.into()))
        } else {
            Err(InteropError::GameVersionFormat(version.into()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GameVersion {
    type Error = InteropError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<GameVersion> for String {
    fn from(value: GameVersion) -> Self {
        value.0.into()
    }
}

impl fmt::Debug for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("GameVersion({})", self.0))
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Native struct offsets that are not covered by the host's object model.
///
/// These move between game patches, so every layout is recorded against the
/// build it was taken from and is only used for that build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub game_version: GameVersion,
    /// Byte offset of the owner's game object pointer within a companion.
    pub companion_owner_offset: usize,
}

impl Layout {
    /// Offset expressed the way it is usually quoted: as an index into the
    /// companion viewed as an array of pointers.
    pub fn companion_owner_slot(&self) -> usize {
        self.companion_owner_offset / size_of::<usize>()
    }
}

/// Address of the game object owning `companion`, or zero.
///
/// # Safety
/// `companion` must be null or point to a live companion laid out as
/// described by `layout`.
pub unsafe fn companion_owner(companion: *const c_void, layout: &Layout) -> usize {
    if companion.is_null() {
        return 0;
    }

    companion
        .cast::<u8>()
        .add(layout.companion_owner_offset)
        .cast::<usize>()
        .read_unaligned()
}
