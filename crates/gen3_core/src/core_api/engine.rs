use crate::creature::{CreatureRecord, Encoded};
use crate::error::{GiftError, ViewError};
use crate::file::{SaveFile, SlotId, SlotStatus, ValidationReport};
use crate::game_version::GameVersion;
use crate::gift::{self, GiftArtifact, TransplantReport};
use crate::layout::{SLOT_A, SLOT_B};
use crate::section::SectionKind;
use crate::views::{BOX_CAPACITY, GameStateFlags, Party, PcStorage, TrainerInfo};

use super::error::{CoreError, CoreErrorCode};
use super::types::{
    Capabilities, CapabilityIssue, CreatureEntry, CreatureLocation, SlotState, SlotSummary,
    Snapshot, ValidationSummary,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug)]
pub struct Session {
    game: GameVersion,
    active_slot: SlotId,
    snapshot: Snapshot,
    capabilities: Capabilities,
    validation: ValidationSummary,
    party: Vec<CreatureEntry>,
    boxed: Vec<CreatureEntry>,
    game_state_flags: Option<GameStateFlags>,
    original: Vec<u8>,
    file: SaveFile,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// `hint` overrides the game version read from the trainer-info section.
    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        hint: Option<GameVersion>,
    ) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();
        let file = SaveFile::parse(bytes).map_err(|e| {
            CoreError::new(
                e.kind().into(),
                format!("failed to parse save file: {e}"),
            )
        })?;

        let report = file.validation_report();
        let latest = file.latest_slot();
        let mut issues = Vec::new();
        let active_slot = match (report.status(latest), report.status(latest.other())) {
            (SlotStatus::Valid, _) => latest,
            (SlotStatus::Invalid(err), SlotStatus::Valid) => {
                log::warn!(
                    "slot {latest} failed validation ({err}); falling back to slot {}",
                    latest.other()
                );
                issues.push(CapabilityIssue::SlotFallback);
                latest.other()
            }
            (SlotStatus::Invalid(err), _) => {
                return Err(CoreError::new(
                    err.kind().into(),
                    format!("no valid save slot: slot {latest}: {err}"),
                ));
            }
            (SlotStatus::Unwritten, _) => {
                return Err(CoreError::new(
                    CoreErrorCode::Format,
                    "no valid save slot: both slots are unwritten",
                ));
            }
        };

        let game = hint.unwrap_or_else(|| file.game_version_of(active_slot));
        build_session(file, bytes.to_vec(), &report, active_slot, game, issues)
    }
}

impl Session {
    pub fn game(&self) -> GameVersion {
        self.game
    }

    pub fn active_slot(&self) -> SlotId {
        self.active_slot
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn validation(&self) -> &ValidationSummary {
        &self.validation
    }

    pub fn party(&self) -> &[CreatureEntry] {
        &self.party
    }

    pub fn boxed(&self) -> &[CreatureEntry] {
        &self.boxed
    }

    pub fn pokedex_owned_count(&self) -> usize {
        self.snapshot.pokedex_owned
    }

    pub fn game_state_flags(&self) -> Option<GameStateFlags> {
        self.game_state_flags
    }

    pub fn file(&self) -> &SaveFile {
        &self.file
    }

    /// Parses, validates and writes a gift file into `target` of the active
    /// slot.
    pub fn apply_gift(
        &mut self,
        gift_bytes: &[u8],
        target: SectionKind,
    ) -> Result<TransplantReport, CoreError> {
        if !self.capabilities.can_apply_gift {
            return Err(CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                format!("{} saves cannot hold a gift", self.game),
            ));
        }
        let gift = GiftArtifact::parse(gift_bytes).map_err(gift_error)?;
        let report =
            gift::transplant_into(&mut self.file, self.active_slot, self.game, &gift, target)
                .map_err(gift_error)?;
        self.validation = summarize(&self.file, &self.file.validation_report());
        Ok(report)
    }

    pub fn to_bytes_unmodified(&self) -> Result<Vec<u8>, CoreError> {
        Ok(self.original.clone())
    }

    /// Serializes the file after edits. Only the active slot is checked; the
    /// other slot may be corrupt on open and must come out byte-identical.
    pub fn to_bytes_modified(&self) -> Result<Vec<u8>, CoreError> {
        let bytes = self.file.to_bytes();
        let reparsed = SaveFile::parse(&bytes).map_err(|e| {
            CoreError::new(
                e.kind().into(),
                format!("modified save failed validation: {e}"),
            )
        })?;
        reparsed
            .slot(self.active_slot)
            .validate()
            .map_err(|e| {
                CoreError::new(
                    e.kind().into(),
                    format!(
                        "modified save failed validation: slot {}: {e}",
                        self.active_slot
                    ),
                )
            })?;

        let inactive = self.active_slot.other();
        let range = match inactive {
            SlotId::A => SLOT_A,
            SlotId::B => SLOT_B,
        };
        if bytes[range.start..range.end] != self.original[range.start..range.end] {
            return Err(CoreError::new(
                CoreErrorCode::Invariant,
                format!("slot {inactive} changed while editing slot {}", self.active_slot),
            ));
        }
        Ok(bytes)
    }
}

fn gift_error(e: GiftError) -> CoreError {
    let code = match e {
        GiftError::UnsupportedVersion(_) | GiftError::TargetOutOfRange { .. } => {
            CoreErrorCode::UnsupportedOperation
        }
        _ => e.kind().into(),
    };
    CoreError::new(code, format!("failed to apply gift: {e}"))
}

fn view_error(e: ViewError) -> CoreError {
    CoreError::new(e.kind().into(), format!("failed to read save data: {e}"))
}

fn build_session(
    file: SaveFile,
    original: Vec<u8>,
    report: &ValidationReport,
    active_slot: SlotId,
    game: GameVersion,
    mut issues: Vec<CapabilityIssue>,
) -> Result<Session, CoreError> {
    let save = file.slot(active_slot);
    let trainer =
        TrainerInfo::read(save.section_by_logical_id(SectionKind::TrainerInfo)).map_err(view_error)?;
    let party = Party::read(save.section_by_logical_id(SectionKind::TeamItems), game)
        .map_err(view_error)?;
    let pc = PcStorage::read(save).map_err(view_error)?;
    let game_state_flags =
        GameStateFlags::read(save.section_by_logical_id(SectionKind::GameState)).ok();

    let party: Vec<CreatureEntry> = party
        .members
        .iter()
        .enumerate()
        .map(|(index, record)| creature_entry(CreatureLocation::Party { index }, record))
        .collect();
    let boxed: Vec<CreatureEntry> = pc
        .occupied()
        .map(|(i, record)| {
            let location = CreatureLocation::Box {
                pc_box: i / BOX_CAPACITY,
                slot: i % BOX_CAPACITY,
            };
            creature_entry(location, record)
        })
        .collect();

    if party.iter().chain(&boxed).any(|c| !c.checksum_valid) {
        issues.push(CapabilityIssue::CreatureChecksumMismatch);
    }

    let snapshot = Snapshot {
        game,
        active_slot,
        save_index: save.save_index(),
        trainer_name_raw: trainer.name_raw.to_vec(),
        gender: trainer.gender,
        public_id: trainer.public_id(),
        secret_id: trainer.secret_id(),
        play_time: trainer.play_time,
        pokedex_owned: trainer.owned_count(),
        pokedex_seen: trainer.seen_count(),
        party_size: party.len(),
        boxed_count: boxed.len(),
        current_box: pc.current_box,
    };

    let capabilities = if game.gift_layout().is_some() {
        Capabilities::editable(issues)
    } else {
        Capabilities::read_only(issues)
    };
    log::debug!(
        "opened {} save from slot {} with {} party and {} boxed creatures",
        game,
        active_slot,
        party.len(),
        boxed.len()
    );

    Ok(Session {
        game,
        active_slot,
        snapshot,
        capabilities,
        validation: summarize(&file, report),
        party,
        boxed,
        game_state_flags,
        original,
        file,
    })
}

fn creature_entry(location: CreatureLocation, record: &CreatureRecord<Encoded>) -> CreatureEntry {
    let decoded = record.clone().decode();
    let checksum_valid = match decoded.check() {
        Ok(()) => true,
        Err(err) => {
            log::warn!("creature at {location:?}: {err}");
            false
        }
    };
    let growth = decoded.growth();
    let misc = decoded.misc();
    CreatureEntry {
        location,
        personality: decoded.personality(),
        species_internal: growth.species,
        national_id: decoded.national_id(),
        nickname_raw: decoded.nickname_raw().to_vec(),
        original_trainer_name_raw: decoded.original_trainer_name_raw().to_vec(),
        original_trainer_id: decoded.original_trainer_id(),
        level: decoded.party_stats().map(|stats| stats.level),
        experience: growth.experience,
        held_item: growth.held_item,
        moves: decoded.attacks().moves,
        shiny: decoded.shiny(),
        egg: misc.is_egg(),
        generation: decoded.generation(),
        legendary: decoded.legendary(),
        mythical: decoded.mythical(),
        starter: decoded.starter(),
        unown_form: decoded.unown_form(),
        checksum_valid,
    }
}

fn summarize(file: &SaveFile, report: &ValidationReport) -> ValidationSummary {
    let slot_summary = |slot: SlotId| {
        let (state, error_kind, error) = match report.status(slot) {
            SlotStatus::Unwritten => (SlotState::Unwritten, None, None),
            SlotStatus::Valid => (SlotState::Valid, None, None),
            SlotStatus::Invalid(err) => (
                SlotState::Invalid,
                Some(err.kind()),
                Some(err.to_string()),
            ),
        };
        SlotSummary {
            slot,
            save_index: file.slot(slot).save_index(),
            state,
            error_kind,
            error,
        }
    };
    ValidationSummary {
        latest: file.latest_slot(),
        a: slot_summary(SlotId::A),
        b: slot_summary(SlotId::B),
    }
}
