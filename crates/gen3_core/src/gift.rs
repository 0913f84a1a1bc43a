//! Wonder card and event script gifts, and moving them into a save.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::checksum::crc16;
use crate::error::GiftError;
use crate::file::{SaveFile, SlotId};
use crate::game_version::GameVersion;
use crate::section::SectionKind;
use crate::slot::GameSave;

pub const GIFT_FILE_SIZE: usize = 1420;
pub const WONDER_CARD_SIZE: usize = 336;
pub const EVENT_SCRIPT_SIZE: usize = 1004;
pub const LINE_LEN: usize = 40;

const CRC_START: usize = 4;
const CARD_COVERED_LEN: usize = 332;
const SCRIPT_LEN: usize = 1000;

/// The icon trails the card by ten bytes of padding in every layout.
const ICON_DISTANCE: usize = 346;

const EVENT_ID_OFFSET: usize = 4;
const DEFAULT_ICON_OFFSET: usize = 6;
const COUNT_OFFSET: usize = 8;
const FLAG_OFFSET: usize = 12;
const STAMP_MAX_OFFSET: usize = 13;
const TITLE_OFFSET: usize = 14;
const SUBTITLE_OFFSET: usize = TITLE_OFFSET + LINE_LEN;
const CONTENT_OFFSET: usize = SUBTITLE_OFFSET + LINE_LEN;
const WARNING_OFFSET: usize = CONTENT_OFFSET + 4 * LINE_LEN;

/// Where the three gift pieces sit, relative to the start of a gift file or
/// of a section payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftLayout {
    pub wonder_card: usize,
    pub event_script: usize,
}

impl GiftLayout {
    pub const FILE: Self = Self {
        wonder_card: 0,
        event_script: 416,
    };
    pub const FRLG: Self = Self {
        wonder_card: 1120,
        event_script: 1948,
    };
    pub const EMERALD: Self = Self {
        wonder_card: 1388,
        event_script: 2216,
    };

    pub fn icon(&self) -> usize {
        self.wonder_card + ICON_DISTANCE
    }

    /// One past the last byte the layout touches.
    pub fn end(&self) -> usize {
        self.event_script + EVENT_SCRIPT_SIZE
    }
}

fn stored_and_computed(record: &[u8], covered: &[u8]) -> (u16, u16) {
    (LittleEndian::read_u16(record), crc16(covered))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WonderCard {
    bytes: [u8; WONDER_CARD_SIZE],
}

impl WonderCard {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GiftError> {
        let bytes: [u8; WONDER_CARD_SIZE] = bytes
            .try_into()
            .map_err(|_| GiftError::InvalidSize(bytes.len()))?;
        Ok(Self { bytes })
    }

    pub fn blank() -> Self {
        let mut card = Self {
            bytes: [0u8; WONDER_CARD_SIZE],
        };
        card.recompute_checksum();
        card
    }

    pub fn as_bytes(&self) -> &[u8; WONDER_CARD_SIZE] {
        &self.bytes
    }

    fn covered(&self) -> &[u8] {
        &self.bytes[CRC_START..CRC_START + CARD_COVERED_LEN]
    }

    pub fn validate(&self) -> Result<(), GiftError> {
        let (stored, computed) = stored_and_computed(&self.bytes, self.covered());
        if stored != computed {
            return Err(GiftError::WonderCardChecksum { stored, computed });
        }
        Ok(())
    }

    pub fn recompute_checksum(&mut self) {
        let checksum = crc16(self.covered());
        LittleEndian::write_u16(&mut self.bytes, checksum);
    }

    pub fn event_id(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[EVENT_ID_OFFSET..])
    }

    pub fn set_event_id(&mut self, event_id: u16) {
        LittleEndian::write_u16(&mut self.bytes[EVENT_ID_OFFSET..], event_id);
    }

    pub fn default_icon(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[DEFAULT_ICON_OFFSET..])
    }

    pub fn count(&self) -> u32 {
        LittleEndian::read_u32(&self.bytes[COUNT_OFFSET..])
    }

    pub fn flag(&self) -> u8 {
        self.bytes[FLAG_OFFSET]
    }

    pub fn stamp_max(&self) -> u8 {
        self.bytes[STAMP_MAX_OFFSET]
    }

    pub fn title_raw(&self) -> &[u8] {
        &self.bytes[TITLE_OFFSET..TITLE_OFFSET + LINE_LEN]
    }

    pub fn title_raw_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[TITLE_OFFSET..TITLE_OFFSET + LINE_LEN]
    }

    pub fn subtitle_raw(&self) -> &[u8] {
        &self.bytes[SUBTITLE_OFFSET..SUBTITLE_OFFSET + LINE_LEN]
    }

    pub fn content_lines_raw(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes[CONTENT_OFFSET..WARNING_OFFSET].chunks_exact(LINE_LEN)
    }

    pub fn warning_lines_raw(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes[WARNING_OFFSET..WARNING_OFFSET + 2 * LINE_LEN].chunks_exact(LINE_LEN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventScript {
    bytes: [u8; EVENT_SCRIPT_SIZE],
}

impl EventScript {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GiftError> {
        let bytes: [u8; EVENT_SCRIPT_SIZE] = bytes
            .try_into()
            .map_err(|_| GiftError::InvalidSize(bytes.len()))?;
        Ok(Self { bytes })
    }

    pub fn blank() -> Self {
        let mut script = Self {
            bytes: [0u8; EVENT_SCRIPT_SIZE],
        };
        script.recompute_checksum();
        script
    }

    pub fn as_bytes(&self) -> &[u8; EVENT_SCRIPT_SIZE] {
        &self.bytes
    }

    pub fn script(&self) -> &[u8] {
        &self.bytes[CRC_START..CRC_START + SCRIPT_LEN]
    }

    pub fn script_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[CRC_START..CRC_START + SCRIPT_LEN]
    }

    pub fn validate(&self) -> Result<(), GiftError> {
        let (stored, computed) = stored_and_computed(&self.bytes, self.script());
        if stored != computed {
            return Err(GiftError::EventScriptChecksum { stored, computed });
        }
        Ok(())
    }

    pub fn recompute_checksum(&mut self) {
        let checksum = crc16(self.script());
        LittleEndian::write_u16(&mut self.bytes, checksum);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftArtifact {
    pub wonder_card: WonderCard,
    pub icon: u16,
    pub event_script: EventScript,
}

impl GiftArtifact {
    /// Splits a standalone gift file. Checksums are not checked here.
    pub fn parse(bytes: &[u8]) -> Result<Self, GiftError> {
        if bytes.len() != GIFT_FILE_SIZE {
            return Err(GiftError::InvalidSize(bytes.len()));
        }
        Self::read_at(bytes, GiftLayout::FILE)
    }

    /// Reads a gift previously stored in `target` of `save`.
    pub fn from_save(
        save: &GameSave,
        target: SectionKind,
        layout: GiftLayout,
    ) -> Result<Self, GiftError> {
        check_target(target, layout)?;
        // A slot with broken rotation can put a shorter section here.
        let span = save.section_by_logical_id(target).data_span();
        if span.len() < layout.end() {
            return Err(GiftError::TargetOutOfRange {
                section: target,
                needed: layout.end(),
                available: span.len(),
            });
        }
        Self::read_at(span, layout)
    }

    fn read_at(bytes: &[u8], layout: GiftLayout) -> Result<Self, GiftError> {
        let card_end = layout.wonder_card + WONDER_CARD_SIZE;
        Ok(Self {
            wonder_card: WonderCard::from_bytes(&bytes[layout.wonder_card..card_end])?,
            icon: LittleEndian::read_u16(&bytes[layout.icon()..]),
            event_script: EventScript::from_bytes(&bytes[layout.event_script..layout.end()])?,
        })
    }

    pub fn validate(&self) -> Result<(), GiftError> {
        self.wonder_card.validate()?;
        self.event_script.validate()
    }

    /// Copies the card, icon and script into `out` at `layout`, leaving the
    /// padding between them as it was.
    pub fn write_at(&self, out: &mut [u8], layout: GiftLayout) {
        out[layout.wonder_card..layout.wonder_card + WONDER_CARD_SIZE]
            .copy_from_slice(self.wonder_card.as_bytes());
        LittleEndian::write_u16(&mut out[layout.icon()..], self.icon);
        out[layout.event_script..layout.end()].copy_from_slice(self.event_script.as_bytes());
    }

    /// Standalone gift file with zeroed padding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; GIFT_FILE_SIZE];
        self.write_at(&mut out, GiftLayout::FILE);
        out
    }
}

fn check_target(target: SectionKind, layout: GiftLayout) -> Result<(), GiftError> {
    let available = target.data_len();
    if available < layout.end() {
        return Err(GiftError::TargetOutOfRange {
            section: target,
            needed: layout.end(),
            available,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransplantReport {
    pub slot: SlotId,
    pub version: GameVersion,
    pub section: SectionKind,
    pub layout: GiftLayout,
    pub checksum_before: u16,
    pub checksum_after: u16,
}

/// Writes `gift` into `target` of the latest save and refreshes that
/// section's checksum. Nothing else in the file changes.
///
/// Which section holds gifts varies between game revisions, so the caller
/// names it.
pub fn transplant(
    file: &mut SaveFile,
    gift: &GiftArtifact,
    target: SectionKind,
) -> Result<TransplantReport, GiftError> {
    let slot = file.latest_slot();
    let version = file.game_version();
    transplant_into(file, slot, version, gift, target)
}

/// Like [`transplant`], with the slot and game version chosen by the caller.
pub fn transplant_into(
    file: &mut SaveFile,
    slot: SlotId,
    version: GameVersion,
    gift: &GiftArtifact,
    target: SectionKind,
) -> Result<TransplantReport, GiftError> {
    gift.validate()?;
    let layout = version
        .gift_layout()
        .ok_or(GiftError::UnsupportedVersion(version))?;
    check_target(target, layout)?;

    let section = file.slot_mut(slot).section_by_logical_id_mut(target);
    let checksum_before = section.checksum();
    gift.write_at(section.payload_mut(), layout);
    section.recompute_checksum();
    let report = TransplantReport {
        slot,
        version,
        section: target,
        layout,
        checksum_before,
        checksum_after: section.checksum(),
    };
    log::info!(
        "transplanted gift event {} into {} of slot {} ({}), checksum {:#06x} -> {:#06x}",
        gift.wonder_card.event_id(),
        target,
        slot,
        version,
        report.checksum_before,
        report.checksum_after
    );
    Ok(report)
}
