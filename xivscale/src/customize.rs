use crate::error::InteropError;
use binrw::{binread, BinRead};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, io::Cursor};

lazy_static! {
    static ref CUSTOMIZE_HEX_REGEX: Regex = Regex::new(r"^(?:[0-9a-fA-F]{2}){26}$").unwrap();
}

/// Position of a value within the customize block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CustomizeIndex {
    Race = 0,
    Gender,
    BodyType,
    Height,
    Clan,
    Face,
    Hairstyle,
    Highlights,
    SkinColor,
    EyeColorRight,
    HairColor,
    HighlightsColor,
    FacialFeature,
    TattooColor,
    Eyebrows,
    EyeColorLeft,
    EyeShape,
    Nose,
    Jaw,
    Mouth,
    LipColor,
    MuscleMass,
    TailShape,
    BustSize,
    FacePaint,
    FacePaintColor,
}

impl CustomizeIndex {
    pub const COUNT: usize = 26;

    pub fn offset(self) -> usize {
        self as usize
    }
}

#[binread]
#[br(little)]
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Customize {
    data: [u8; CustomizeIndex::COUNT],
}

impl Customize {
    pub fn new(data: [u8; CustomizeIndex::COUNT]) -> Self {
        Self { data }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InteropError> {
        Self::read(&mut Cursor::new(bytes)).map_err(InteropError::CustomizeRead)
    }

    pub fn to_bytes(&self) -> [u8; CustomizeIndex::COUNT] {
        self.data
    }

    pub fn from_hex(hex: &str) -> Result<Self, InteropError> {
        let hex = hex.trim();
        if !CUSTOMIZE_HEX_REGEX.is_match(hex) {
            return Err(InteropError::CustomizeFormat(hex.into()));
        }

        let mut data = [0u8; CustomizeIndex::COUNT];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| InteropError::CustomizeFormat(hex.into()))?;
        }
        Ok(Self { data })
    }

    pub fn to_hex(&self) -> String {
        self.data.iter().map(|b| format!("{b:02X}")).collect()
    }

    pub fn get(&self, index: CustomizeIndex) -> u8 {
        self.data[index.offset()]
    }

    pub fn set(&mut self, index: CustomizeIndex, value: u8) {
        self.data[index.offset()] = value;
    }

    pub fn race(&self) -> u8 {
        self.get(CustomizeIndex::Race)
    }

    pub fn sex(&self) -> u8 {
        self.get(CustomizeIndex::Gender)
    }

    pub fn body_type(&self) -> u8 {
        self.get(CustomizeIndex::BodyType)
    }

    pub fn height(&self) -> u8 {
        self.get(CustomizeIndex::Height)
    }

    pub fn tribe(&self) -> u8 {
        self.get(CustomizeIndex::Clan)
    }
}

impl fmt::Debug for Customize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "Customize({} {} {}, body {}, height {})",
            Race::from_raw(self.race()),
            Tribe::from_raw(self.tribe()),
            Gender::from_raw(self.sex()),
            self.body_type(),
            self.height()
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Race {
    Hyur,
    Elezen,
    Lalafell,
    Miqote,
    Roegadyn,
    AuRa,
    Hrothgar,
    Viera,
    Unknown(u8),
}

impl Race {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Hyur,
            2 => Self::Elezen,
            3 => Self::Lalafell,
            4 => Self::Miqote,
            5 => Self::Roegadyn,
            6 => Self::AuRa,
            7 => Self::Hrothgar,
            8 => Self::Viera,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::Hyur => 1,
            Self::Elezen => 2,
            Self::Lalafell => 3,
            Self::Miqote => 4,
            Self::Roegadyn => 5,
            Self::AuRa => 6,
            Self::Hrothgar => 7,
            Self::Viera => 8,
            Self::Unknown(other) => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Hyur => "Hyur",
            Self::Elezen => "Elezen",
            Self::Lalafell => "Lalafell",
            Self::Miqote => "Miqo'te",
            Self::Roegadyn => "Roegadyn",
            Self::AuRa => "Au Ra",
            Self::Hrothgar => "Hrothgar",
            Self::Viera => "Viera",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown race ({v})"),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tribe {
    Midlander,
    Highlander,
    Wildwood,
    Duskwight,
    Plainsfolk,
    Dunesfolk,
    SeekerOfTheSun,
    KeeperOfTheMoon,
    SeaWolf,
    Hellsguard,
    Raen,
    Xaela,
    Hellion,
    Lost,
    Rava,
    Veena,
    Unknown(u8),
}

impl Tribe {
    const ALL: [Tribe; 16] = [
        Self::Midlander,
        Self::Highlander,
        Self::Wildwood,
        Self::Duskwight,
        Self::Plainsfolk,
        Self::Dunesfolk,
        Self::SeekerOfTheSun,
        Self::KeeperOfTheMoon,
        Self::SeaWolf,
        Self::Hellsguard,
        Self::Raen,
        Self::Xaela,
        Self::Hellion,
        Self::Lost,
        Self::Rava,
        Self::Veena,
    ];

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1..=16 => Self::ALL[raw as usize - 1],
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::Unknown(other) => other,
            known => Self::ALL.iter().position(|t| *t == known).map_or(0, |i| i as u8 + 1),
        }
    }

    /// Tribes come in pairs, two per race.
    pub fn race(&self) -> Race {
        match *self {
            Self::Unknown(_) => Race::Unknown(0),
            known => Race::from_raw((known.raw() + 1) / 2),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Midlander => "Midlander",
            Self::Highlander => "Highlander",
            Self::Wildwood => "Wildwood",
            Self::Duskwight => "Duskwight",
            Self::Plainsfolk => "Plainsfolk",
            Self::Dunesfolk => "Dunesfolk",
            Self::SeekerOfTheSun => "Seeker of the Sun",
            Self::KeeperOfTheMoon => "Keeper of the Moon",
            Self::SeaWolf => "Sea Wolf",
            Self::Hellsguard => "Hellsguard",
            Self::Raen => "Raen",
            Self::Xaela => "Xaela",
            Self::Hellion => "Hellion",
            Self::Lost => "The Lost",
            Self::Rava => "Rava",
            Self::Veena => "Veena",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Tribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown tribe ({v})"),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown(u8),
}

impl Gender {
    pub const MALE_RAW: u8 = 0;
    pub const FEMALE_RAW: u8 = 1;

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            Self::MALE_RAW => Self::Male,
            Self::FEMALE_RAW => Self::Female,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::Male => Self::MALE_RAW,
            Self::Female => Self::FEMALE_RAW,
            Self::Unknown(other) => other,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
            Self::Unknown(v) => write!(f, "Unknown gender ({v})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customize_from_hex() {
        let c = Customize::from_hex("0201050A030102030405060708090A0B0C0D0E0F101112131415").unwrap();
        assert_eq!(c.race(), 2);
        assert_eq!(c.sex(), 1);
        assert_eq!(c.body_type(), 5);
        assert_eq!(c.height(), 10);
        assert_eq!(c.tribe(), 3);
        assert_eq!(c.get(CustomizeIndex::FacePaintColor), 0x15);
        assert_eq!(c.to_hex(), "0201050A030102030405060708090A0B0C0D0E0F101112131415");

        assert!(Customize::from_hex("0201").is_err());
        assert!(Customize::from_hex("zz01050A030102030405060708090A0B0C0D0E0F101112131415").is_err());
    }

    #[test]
    fn customize_bytes() {
        let mut raw = [0u8; 26];
        raw[CustomizeIndex::Height.offset()] = 50;
        raw[CustomizeIndex::Clan.offset()] = 9;

        let c = Customize::from_bytes(&raw).unwrap();
        assert_eq!(c.height(), 50);
        assert_eq!(c.tribe(), 9);
        assert_eq!(c.to_bytes(), raw);

        assert!(Customize::from_bytes(&raw[..10]).is_err());
    }

    #[test]
    fn tribe_belongs_to_race() {
        assert_eq!(Tribe::from_raw(3), Tribe::Wildwood);
        assert_eq!(Tribe::Wildwood.race(), Race::Elezen);
        assert_eq!(Tribe::Veena.race(), Race::Viera);
        assert_eq!(Tribe::Veena.raw(), 16);
        assert_eq!(Tribe::from_raw(0), Tribe::Unknown(0));
        assert_eq!(Race::from_raw(4).to_string(), "Miqo'te");
    }
}
