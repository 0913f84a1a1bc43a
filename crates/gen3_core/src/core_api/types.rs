use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::file::SlotId;
use crate::game_version::GameVersion;
use crate::gender::Gender;
use crate::views::PlayTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub game: GameVersion,
    pub active_slot: SlotId,
    pub save_index: u32,
    /// Game-charset bytes; see the render crate for decoding.
    pub trainer_name_raw: Vec<u8>,
    pub gender: Gender,
    pub public_id: u16,
    pub secret_id: u16,
    pub play_time: PlayTime,
    pub pokedex_owned: usize,
    pub pokedex_seen: usize,
    pub party_size: usize,
    pub boxed_count: usize,
    pub current_box: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureLocation {
    Party { index: usize },
    Box { pc_box: usize, slot: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatureEntry {
    pub location: CreatureLocation,
    pub personality: u32,
    pub species_internal: u16,
    pub national_id: u16,
    pub nickname_raw: Vec<u8>,
    pub original_trainer_name_raw: Vec<u8>,
    pub original_trainer_id: u32,
    /// Stored level for party members; box records only carry experience.
    pub level: Option<u8>,
    pub experience: u32,
    pub held_item: u16,
    pub moves: [u16; 4],
    pub shiny: bool,
    pub egg: bool,
    pub generation: Option<u8>,
    pub legendary: bool,
    pub mythical: bool,
    pub starter: bool,
    pub unown_form: Option<u8>,
    pub checksum_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    Unwritten,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotSummary {
    pub slot: SlotId,
    pub save_index: u32,
    pub state: SlotState,
    pub error_kind: Option<ErrorKind>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSummary {
    pub latest: SlotId,
    pub a: SlotSummary,
    pub b: SlotSummary,
}

impl ValidationSummary {
    pub fn all_valid(&self) -> bool {
        [&self.a, &self.b]
            .iter()
            .all(|s| s.state != SlotState::Invalid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityIssue {
    /// The newest slot failed validation and the older one was loaded.
    SlotFallback,
    CreatureChecksumMismatch,
    /// Ruby and sapphire saves have nowhere to store a gift.
    GiftStorageUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capabilities {
    pub can_query: bool,
    pub can_apply_gift: bool,
    pub issues: Vec<CapabilityIssue>,
}

impl Capabilities {
    pub fn read_only(mut issues: Vec<CapabilityIssue>) -> Self {
        if !issues.contains(&CapabilityIssue::GiftStorageUnavailable) {
            issues.push(CapabilityIssue::GiftStorageUnavailable);
        }

        Self {
            can_query: true,
            can_apply_gift: false,
            issues,
        }
    }

    pub fn editable(mut issues: Vec<CapabilityIssue>) -> Self {
        issues.retain(|issue| *issue != CapabilityIssue::GiftStorageUnavailable);

        Self {
            can_query: true,
            can_apply_gift: true,
            issues,
        }
    }
}
