use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FileError, SlotError};
use crate::game_version::GameVersion;
use crate::layout::{
    BATTLE_LOG, FileLayout, GIFT_STAGING, HALL_OF_FAME, SAVE_FILE_SIZE, SLOT_A, SLOT_B,
};
use crate::section::SectionKind;
use crate::slot::GameSave;

/// Save index the game leaves in a slot it has never written.
pub const UNWRITTEN_SAVE_INDEX: u32 = 0xFFFF_FFFF;

pub const GAME_CODE_OFFSET: usize = 0xAC;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::A => "a",
            Self::B => "b",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    Unwritten,
    Valid,
    Invalid(SlotError),
}

impl SlotStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub a: SlotStatus,
    pub b: SlotStatus,
}

impl ValidationReport {
    pub fn status(&self, slot: SlotId) -> &SlotStatus {
        match slot {
            SlotId::A => &self.a,
            SlotId::B => &self.b,
        }
    }
}

/// The whole 128 KiB save: two redundant slots plus three regions that are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    a: GameSave,
    b: GameSave,
    hall_of_fame: Vec<u8>,
    gift_staging: Vec<u8>,
    battle_log: Vec<u8>,
}

impl SaveFile {
    pub fn parse(bytes: &[u8]) -> Result<Self, FileError> {
        if bytes.len() != SAVE_FILE_SIZE {
            return Err(FileError::InvalidSize(bytes.len()));
        }
        let slot = |slot: SlotId, range: std::ops::Range<usize>| {
            GameSave::from_bytes(&bytes[range]).map_err(|source| FileError::Slot { slot, source })
        };
        let file = Self {
            a: slot(SlotId::A, SLOT_A.start..SLOT_A.end)?,
            b: slot(SlotId::B, SLOT_B.start..SLOT_B.end)?,
            hall_of_fame: bytes[HALL_OF_FAME.start..HALL_OF_FAME.end].to_vec(),
            gift_staging: bytes[GIFT_STAGING.start..GIFT_STAGING.end].to_vec(),
            battle_log: bytes[BATTLE_LOG.start..BATTLE_LOG.end].to_vec(),
        };
        log::debug!(
            "parsed save file: slot a index {:#x}, slot b index {:#x}",
            file.a.save_index(),
            file.b.save_index()
        );
        Ok(file)
    }

    /// Assembles a file from two slots with zeroed trailing regions.
    pub fn blank(a: GameSave, b: GameSave) -> Self {
        Self {
            a,
            b,
            hall_of_fame: vec![0; HALL_OF_FAME.len()],
            gift_staging: vec![0; GIFT_STAGING.len()],
            battle_log: vec![0; BATTLE_LOG.len()],
        }
    }

    pub fn layout(&self) -> FileLayout {
        FileLayout::standard()
    }

    pub fn slot(&self, slot: SlotId) -> &GameSave {
        match slot {
            SlotId::A => &self.a,
            SlotId::B => &self.b,
        }
    }

    pub fn slot_mut(&mut self, slot: SlotId) -> &mut GameSave {
        match slot {
            SlotId::A => &mut self.a,
            SlotId::B => &mut self.b,
        }
    }

    pub fn hall_of_fame(&self) -> &[u8] {
        &self.hall_of_fame
    }

    pub fn gift_staging(&self) -> &[u8] {
        &self.gift_staging
    }

    pub fn battle_log(&self) -> &[u8] {
        &self.battle_log
    }

    pub fn slot_a_unwritten(&self) -> bool {
        self.a.save_index() == UNWRITTEN_SAVE_INDEX
    }

    /// Slot `a` is skipped while unwritten; slot `b` is always checked.
    pub fn validate(&self) -> Result<(), FileError> {
        if !self.slot_a_unwritten() {
            self.a.validate().map_err(|source| FileError::Slot {
                slot: SlotId::A,
                source,
            })?;
        }
        self.b.validate().map_err(|source| FileError::Slot {
            slot: SlotId::B,
            source,
        })
    }

    pub fn validation_report(&self) -> ValidationReport {
        let status = |save: &GameSave| match save.validate() {
            Ok(()) => SlotStatus::Valid,
            Err(err) => SlotStatus::Invalid(err),
        };
        ValidationReport {
            a: if self.slot_a_unwritten() {
                SlotStatus::Unwritten
            } else {
                status(&self.a)
            },
            b: status(&self.b),
        }
    }

    /// `a` only when strictly newer than `b` and actually written. An unwritten
    /// `a` carries save index `0xFFFFFFFF`, which would otherwise always win.
    /// Ties go to `b`.
    pub fn latest_slot(&self) -> SlotId {
        if !self.slot_a_unwritten() && self.a.save_index() > self.b.save_index() {
            SlotId::A
        } else {
            SlotId::B
        }
    }

    pub fn latest_save(&self) -> &GameSave {
        self.slot(self.latest_slot())
    }

    pub fn latest_save_mut(&mut self) -> &mut GameSave {
        self.slot_mut(self.latest_slot())
    }

    pub fn game_version(&self) -> GameVersion {
        self.game_version_of(self.latest_slot())
    }

    pub fn game_version_of(&self, slot: SlotId) -> GameVersion {
        let trainer = self.slot(slot).section_by_logical_id(SectionKind::TrainerInfo);
        GameVersion::from_code(trainer.payload()[GAME_CODE_OFFSET])
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SAVE_FILE_SIZE);
        self.a.write_to(&mut out);
        self.b.write_to(&mut out);
        out.extend_from_slice(&self.hall_of_fame);
        out.extend_from_slice(&self.gift_staging);
        out.extend_from_slice(&self.battle_log);
        out
    }
}
