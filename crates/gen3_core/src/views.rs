//! Typed reads of individual logical sections.

use serde::{Deserialize, Serialize};

use crate::creature::{BOX_RECORD_SIZE, CreatureRecord, Encoded, PARTY_RECORD_SIZE};
use crate::error::ViewError;
use crate::game_version::GameVersion;
use crate::gender::Gender;
use crate::reader::LittleEndianReader;
use crate::section::{Section, SectionKind};
use crate::slot::GameSave;
use crate::species::MAX_NATIONAL_ID;

pub const TRAINER_NAME_LEN: usize = 7;
pub const POKEDEX_BYTES: usize = 49;
const POKEDEX_OWNED_OFFSET: u64 = 0x28;
const POKEDEX_SEEN_OFFSET: u64 = 0x5C;
const TRAINER_GAME_CODE_OFFSET: u64 = 0xAC;

pub const PARTY_CAPACITY: usize = 6;

pub const BOX_COUNT: usize = 14;
pub const BOX_CAPACITY: usize = 30;
pub const BOX_NAME_LEN: usize = 9;
const PC_HEADER_SIZE: usize = 4;
const PC_STORAGE_SIZE: usize =
    PC_HEADER_SIZE + BOX_COUNT * BOX_CAPACITY * BOX_RECORD_SIZE + BOX_COUNT * BOX_NAME_LEN + BOX_COUNT;

fn require(what: &'static str, bytes: &[u8], needed: usize) -> Result<(), ViewError> {
    if bytes.len() < needed {
        return Err(ViewError::TooShort {
            what,
            needed,
            actual: bytes.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTime {
    pub hours: u16,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerInfo {
    pub name_raw: [u8; TRAINER_NAME_LEN],
    pub gender: Gender,
    pub trainer_id: u32,
    pub play_time: PlayTime,
    pub game_code: u8,
    owned: [u8; POKEDEX_BYTES],
    seen: [u8; POKEDEX_BYTES],
}

impl TrainerInfo {
    pub fn read(section: &Section) -> Result<Self, ViewError> {
        let span = section.data_span();
        require("trainer info", span, TRAINER_GAME_CODE_OFFSET as usize + 1)?;
        let mut r = LittleEndianReader::from_slice(span);

        let name_raw = r.read_array::<TRAINER_NAME_LEN>()?;
        r.skip(1)?;
        let gender = Gender::from_raw(r.read_u8()?);
        r.skip(1)?;
        let trainer_id = r.read_u32()?;
        let play_time = PlayTime {
            hours: r.read_u16()?,
            minutes: r.read_u8()?,
            seconds: r.read_u8()?,
            frames: r.read_u8()?,
        };

        r.seek_to(POKEDEX_OWNED_OFFSET)?;
        let owned = r.read_array::<POKEDEX_BYTES>()?;
        r.seek_to(POKEDEX_SEEN_OFFSET)?;
        let seen = r.read_array::<POKEDEX_BYTES>()?;
        r.seek_to(TRAINER_GAME_CODE_OFFSET)?;
        let game_code = r.read_u8()?;

        Ok(Self {
            name_raw,
            gender,
            trainer_id,
            play_time,
            game_code,
            owned,
            seen,
        })
    }

    pub fn public_id(&self) -> u16 {
        self.trainer_id as u16
    }

    pub fn secret_id(&self) -> u16 {
        (self.trainer_id >> 16) as u16
    }

    pub fn pokedex_owned(&self, national_id: u16) -> bool {
        dex_bit(&self.owned, national_id)
    }

    pub fn pokedex_seen(&self, national_id: u16) -> bool {
        dex_bit(&self.seen, national_id)
    }

    pub fn owned_count(&self) -> usize {
        (1..=MAX_NATIONAL_ID).filter(|&n| self.pokedex_owned(n)).count()
    }

    pub fn seen_count(&self) -> usize {
        (1..=MAX_NATIONAL_ID).filter(|&n| self.pokedex_seen(n)).count()
    }
}

fn dex_bit(bits: &[u8; POKEDEX_BYTES], national_id: u16) -> bool {
    if national_id == 0 || national_id > MAX_NATIONAL_ID {
        return false;
    }
    let i = (national_id - 1) as usize;
    (bits[i >> 3] >> (i & 7)) & 1 != 0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub members: Vec<CreatureRecord<Encoded>>,
}

impl Party {
    pub fn read(section: &Section, version: GameVersion) -> Result<Self, ViewError> {
        let span = section.data_span();
        let size_offset = version.team_size_offset();
        let list_offset = version.team_list_offset();
        require("team size", span, size_offset + 4)?;

        let mut r = LittleEndianReader::from_slice(span);
        r.seek_to(size_offset as u64)?;
        let team_size = r.read_u32()?;
        if team_size as usize > PARTY_CAPACITY {
            return Err(ViewError::TeamTooLarge(team_size));
        }

        let list_end = list_offset + team_size as usize * PARTY_RECORD_SIZE;
        require("team list", span, list_end)?;
        let members = span[list_offset..list_end]
            .chunks_exact(PARTY_RECORD_SIZE)
            .map(CreatureRecord::<Encoded>::from_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("read party of {} for {}", members.len(), version);
        Ok(Self { members })
    }

    /// Writes `members` back at the version's team offsets. The caller
    /// recomputes the section checksum. On error the section is unchanged.
    pub fn write(
        section: &mut Section,
        version: GameVersion,
        members: &[CreatureRecord<Encoded>],
    ) -> Result<(), ViewError> {
        if members.len() > PARTY_CAPACITY {
            return Err(ViewError::TeamTooLarge(members.len() as u32));
        }
        if let Some(member) = members.iter().find(|m| !m.is_party()) {
            return Err(ViewError::InvalidRecordSize(member.as_bytes().len()));
        }
        let list_offset = version.team_list_offset();
        let span = section.data_span_mut();
        require("team list", span, list_offset + PARTY_CAPACITY * PARTY_RECORD_SIZE)?;

        let size_offset = version.team_size_offset();
        span[size_offset..size_offset + 4].copy_from_slice(&(members.len() as u32).to_le_bytes());
        for (i, member) in members.iter().enumerate() {
            let start = list_offset + i * PARTY_RECORD_SIZE;
            span[start..start + PARTY_RECORD_SIZE].copy_from_slice(member.as_bytes());
        }
        Ok(())
    }
}

/// The PC boxes, spread across logical sections PcBufferA..=PcBufferI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcStorage {
    pub current_box: u32,
    pub records: Vec<CreatureRecord<Encoded>>,
    pub box_names_raw: [[u8; BOX_NAME_LEN]; BOX_COUNT],
    pub wallpapers: [u8; BOX_COUNT],
}

impl PcStorage {
    pub fn read(save: &GameSave) -> Result<Self, ViewError> {
        let bytes = save.sections_contiguous(SectionKind::PcBufferA, SectionKind::PcBufferI);
        require("pc storage", &bytes, PC_STORAGE_SIZE)?;
        let mut r = LittleEndianReader::from_slice(&bytes);

        let current_box = r.read_u32()?;
        let mut records = Vec::with_capacity(BOX_COUNT * BOX_CAPACITY);
        for _ in 0..BOX_COUNT * BOX_CAPACITY {
            let raw = r.read_array::<BOX_RECORD_SIZE>()?;
            records.push(CreatureRecord::<Encoded>::from_bytes(&raw)?);
        }
        let mut box_names_raw = [[0u8; BOX_NAME_LEN]; BOX_COUNT];
        for name in &mut box_names_raw {
            *name = r.read_array::<BOX_NAME_LEN>()?;
        }
        let wallpapers = r.read_array::<BOX_COUNT>()?;

        Ok(Self {
            current_box,
            records,
            box_names_raw,
            wallpapers,
        })
    }

    /// Records of one box, empty slots included.
    pub fn pc_box(&self, index: usize) -> Option<&[CreatureRecord<Encoded>]> {
        (index < BOX_COUNT).then(|| &self.records[index * BOX_CAPACITY..(index + 1) * BOX_CAPACITY])
    }

    pub fn occupied(&self) -> impl Iterator<Item = (usize, &CreatureRecord<Encoded>)> {
        self.records.iter().enumerate().filter(|(_, r)| !r.is_empty())
    }
}

const MYSTERY_EVENT_BYTE: usize = 0x405;
const MYSTERY_EVENT_BIT: u8 = 5;
const MYSTERY_GIFT_BYTE: usize = 0x40B;
const MYSTERY_GIFT_BIT: u8 = 3;
const EON_TICKET_BYTE: usize = 0x49A;
const EON_TICKET_BIT: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStateFlags {
    pub mystery_event: bool,
    pub mystery_gift: bool,
    pub eon_ticket: bool,
}

impl GameStateFlags {
    pub fn read(section: &Section) -> Result<Self, ViewError> {
        let span = section.data_span();
        require("game state flags", span, EON_TICKET_BYTE + 1)?;
        let bit = |byte: usize, bit: u8| (span[byte] >> bit) & 1 != 0;
        Ok(Self {
            mystery_event: bit(MYSTERY_EVENT_BYTE, MYSTERY_EVENT_BIT),
            mystery_gift: bit(MYSTERY_GIFT_BYTE, MYSTERY_GIFT_BIT),
            eon_ticket: bit(EON_TICKET_BYTE, EON_TICKET_BIT),
        })
    }

    /// Sets or clears the three bits, leaving their neighbours alone. The
    /// caller recomputes the section checksum.
    pub fn write(&self, section: &mut Section) -> Result<(), ViewError> {
        let span = section.data_span_mut();
        require("game state flags", span, EON_TICKET_BYTE + 1)?;
        for (byte, bit, on) in [
            (MYSTERY_EVENT_BYTE, MYSTERY_EVENT_BIT, self.mystery_event),
            (MYSTERY_GIFT_BYTE, MYSTERY_GIFT_BIT, self.mystery_gift),
            (EON_TICKET_BYTE, EON_TICKET_BIT, self.eon_ticket),
        ] {
            if on {
                span[byte] |= 1 << bit;
            } else {
                span[byte] &= !(1 << bit);
            }
        }
        Ok(())
    }
}
