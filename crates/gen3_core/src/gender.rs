use std::fmt;

use serde::{Deserialize, Serialize};

/// Trainer gender byte at trainer-info 0x08. The games only ever write 0 or
/// 1; other values are kept so the byte survives a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown(u8),
}

impl Gender {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Male,
            1 => Self::Female,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female => 1,
            Self::Unknown(other) => other,
        }
    }
}

impl From<u8> for Gender {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
            Self::Unknown(raw) => write!(f, "Unknown ({raw})"),
        }
    }
}
