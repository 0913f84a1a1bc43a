use serde::{Deserialize, Serialize};

use crate::file::SlotId;
use crate::game_version::GameVersion;
use crate::section::SectionKind;

/// Coarse classification shared by every codec error.
///
/// `Format` and `Invariant` failures mean the affected region cannot be
/// trusted structurally. `Checksum` failures are reported per section and do
/// not stop inspection of the rest of the slot. `CreatureChecksum` is never
/// fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Format,
    Checksum,
    CreatureChecksum,
    Invariant,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    #[error("invalid section size: {0} bytes")]
    InvalidSize(usize),

    #[error("unrecognized section id {0}")]
    UnknownSectionId(u16),

    #[error("bad section signature: {0:#010x}")]
    BadSignature(u32),

    #[error("section {section_id} checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        section_id: u16,
        stored: u16,
        computed: u16,
    },
}

impl SectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChecksumMismatch { .. } => ErrorKind::Checksum,
            _ => ErrorKind::Format,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFailure {
    pub physical_index: usize,
    pub error: SectionError,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("invalid game save size: {0} bytes")]
    InvalidSize(usize),

    #[error("invalid section count: {0}")]
    InvalidSectionCount(usize),

    #[error("{} section(s) failed validation{}", .0.len(), describe_first(.0))]
    Sections(Vec<SectionFailure>),

    #[error("section rotation broken at physical index {physical_index}: expected id {expected}, found {found}")]
    Rotation {
        physical_index: usize,
        expected: u16,
        found: u16,
    },

    #[error("save index mismatch at physical index {physical_index}: expected {expected}, found {found}")]
    SaveIndexMismatch {
        physical_index: usize,
        expected: u32,
        found: u32,
    },
}

fn describe_first(failures: &[SectionFailure]) -> String {
    match failures.first() {
        Some(f) => format!(" (first at physical index {}: {})", f.physical_index, f.error),
        None => String::new(),
    }
}

impl SlotError {
    /// The most severe kind present. An aggregate of section failures is a
    /// format error if any member is, otherwise a checksum error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSize(_) | Self::InvalidSectionCount(_) => ErrorKind::Format,
            Self::Sections(failures) => {
                if failures
                    .iter()
                    .any(|f| f.error.kind() == ErrorKind::Format)
                {
                    ErrorKind::Format
                } else {
                    ErrorKind::Checksum
                }
            }
            Self::Rotation { .. } | Self::SaveIndexMismatch { .. } => ErrorKind::Invariant,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("invalid save file size: {0} bytes, expected 131072")]
    InvalidSize(usize),

    #[error("slot {slot} failed validation: {source}")]
    Slot {
        slot: SlotId,
        #[source]
        source: SlotError,
    },
}

impl FileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSize(_) => ErrorKind::Format,
            Self::Slot { source, .. } => source.kind(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("creature checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
pub struct CreatureChecksumError {
    pub stored: u16,
    pub computed: u16,
}

impl CreatureChecksumError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::CreatureChecksum
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("{what} needs {needed} bytes, got {actual}")]
    TooShort {
        what: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("team size {0} exceeds 6")]
    TeamTooLarge(u32),

    #[error("creature record must be 80 or 100 bytes, got {0}")]
    InvalidRecordSize(usize),

    #[error("unexpected end of data: {0}")]
    UnexpectedEof(String),
}

impl From<std::io::Error> for ViewError {
    fn from(err: std::io::Error) -> Self {
        Self::UnexpectedEof(err.to_string())
    }
}

impl ViewError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Format
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GiftError {
    #[error("invalid gift size: {0} bytes")]
    InvalidSize(usize),

    #[error("wonder card checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    WonderCardChecksum { stored: u16, computed: u16 },

    #[error("event script checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    EventScriptChecksum { stored: u16, computed: u16 },

    #[error("{0} saves have no wonder card storage")]
    UnsupportedVersion(GameVersion),

    #[error("{section} section holds {available} checksummed bytes, gift layout needs {needed}")]
    TargetOutOfRange {
        section: SectionKind,
        needed: usize,
        available: usize,
    },
}

impl GiftError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WonderCardChecksum { .. } | Self::EventScriptChecksum { .. } => {
                ErrorKind::Checksum
            }
            _ => ErrorKind::Format,
        }
    }
}
