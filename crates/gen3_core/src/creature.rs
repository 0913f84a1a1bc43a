//! Creature records as stored in the party and in PC boxes.
//!
//! The four 12-byte substructures after the header are shuffled by a
//! personality-dependent permutation and XOR-encrypted with
//! `original_trainer_id ^ personality`. A record read from a save starts out
//! as [`CreatureRecord<Encoded>`]; [`CreatureRecord::decode`] consumes it, so
//! a record can never be decoded twice.

use std::fmt;
use std::marker::PhantomData;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::error::{CreatureChecksumError, ViewError};
use crate::growth::GrowthRate;
use crate::species;

pub const BOX_RECORD_SIZE: usize = 80;
pub const PARTY_RECORD_SIZE: usize = 100;

const NICKNAME_OFFSET: usize = 0x08;
const LANGUAGE_OFFSET: usize = 0x12;
const MISC_FLAGS_OFFSET: usize = 0x13;
const OT_NAME_OFFSET: usize = 0x14;
const MARKINGS_OFFSET: usize = 0x1B;
const CHECKSUM_OFFSET: usize = 0x1C;
const DATA_OFFSET: usize = 0x20;
const SUBSTRUCTURE_SIZE: usize = 12;
const DATA_SIZE: usize = SUBSTRUCTURE_SIZE * 4;
const PARTY_OFFSET: usize = DATA_OFFSET + DATA_SIZE;

pub const NICKNAME_LEN: usize = 10;
pub const OT_NAME_LEN: usize = 7;

const UNOWN_NATIONAL_ID: u16 = 201;

/// Physical placement of the substructures for each `personality % 24`.
/// Entry `i` names the canonical substructure stored at position `i`.
const ORDERS: [[u8; 4]; 24] = [
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 1, 3],
    [0, 2, 3, 1],
    [0, 3, 1, 2],
    [0, 3, 2, 1],
    [1, 0, 2, 3],
    [1, 0, 3, 2],
    [1, 2, 0, 3],
    [1, 2, 3, 0],
    [1, 3, 0, 2],
    [1, 3, 2, 0],
    [2, 0, 1, 3],
    [2, 0, 3, 1],
    [2, 1, 0, 3],
    [2, 1, 3, 0],
    [2, 3, 0, 1],
    [2, 3, 1, 0],
    [3, 0, 1, 2],
    [3, 0, 2, 1],
    [3, 1, 0, 2],
    [3, 1, 2, 0],
    [3, 2, 0, 1],
    [3, 2, 1, 0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded;

/// Canonical substructure positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substructure {
    Growth,
    Attacks,
    EvsCondition,
    Misc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Growth {
    pub species: u16,
    pub held_item: u16,
    pub experience: u32,
    pub pp_bonuses: u8,
    pub friendship: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attacks {
    pub moves: [u16; 4],
    pub pp: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvsCondition {
    pub hp_ev: u8,
    pub attack_ev: u8,
    pub defense_ev: u8,
    pub speed_ev: u8,
    pub sp_attack_ev: u8,
    pub sp_defense_ev: u8,
    pub coolness: u8,
    pub beauty: u8,
    pub cuteness: u8,
    pub smartness: u8,
    pub toughness: u8,
    pub feel: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misc {
    pub pokerus: u8,
    pub met_location: u8,
    pub origins_info: u16,
    pub iv_egg_ability: u32,
    pub ribbons_obedience: u32,
}

impl Misc {
    /// HP, attack, defense, speed, sp. attack, sp. defense; 5 bits each.
    pub fn ivs(&self) -> [u8; 6] {
        std::array::from_fn(|i| ((self.iv_egg_ability >> (5 * i)) & 0x1F) as u8)
    }

    pub fn is_egg(&self) -> bool {
        self.iv_egg_ability & (1 << 30) != 0
    }

    pub fn ability_slot(&self) -> u8 {
        (self.iv_egg_ability >> 31) as u8
    }

    pub fn met_level(&self) -> u8 {
        (self.origins_info & 0x7F) as u8
    }
}

/// Battle stats kept only in party records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStats {
    pub status: u32,
    pub level: u8,
    pub mail_id: u8,
    pub current_hp: u16,
    pub total_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
}

#[derive(Clone, PartialEq, Eq)]
pub struct CreatureRecord<S> {
    bytes: Vec<u8>,
    state: PhantomData<S>,
}

impl<S> CreatureRecord<S> {
    fn with_bytes<T>(bytes: Vec<u8>) -> CreatureRecord<T> {
        CreatureRecord {
            bytes,
            state: PhantomData,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_party(&self) -> bool {
        self.bytes.len() == PARTY_RECORD_SIZE
    }

    /// A zero personality marks an unused box or party slot.
    pub fn is_empty(&self) -> bool {
        self.personality() == 0
    }

    pub fn personality(&self) -> u32 {
        LittleEndian::read_u32(&self.bytes[0..])
    }

    pub fn original_trainer_id(&self) -> u32 {
        LittleEndian::read_u32(&self.bytes[4..])
    }

    pub fn trainer_public_id(&self) -> u16 {
        self.original_trainer_id() as u16
    }

    pub fn trainer_secret_id(&self) -> u16 {
        (self.original_trainer_id() >> 16) as u16
    }

    pub fn nickname_raw(&self) -> &[u8] {
        &self.bytes[NICKNAME_OFFSET..NICKNAME_OFFSET + NICKNAME_LEN]
    }

    pub fn language(&self) -> u8 {
        self.bytes[LANGUAGE_OFFSET]
    }

    pub fn misc_flags(&self) -> u8 {
        self.bytes[MISC_FLAGS_OFFSET]
    }

    pub fn original_trainer_name_raw(&self) -> &[u8] {
        &self.bytes[OT_NAME_OFFSET..OT_NAME_OFFSET + OT_NAME_LEN]
    }

    pub fn markings(&self) -> u8 {
        self.bytes[MARKINGS_OFFSET]
    }

    pub fn stored_checksum(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[CHECKSUM_OFFSET..])
    }

    /// Party fields are stored in the clear, so they are readable in
    /// either state.
    pub fn party_stats(&self) -> Option<PartyStats> {
        if !self.is_party() {
            return None;
        }
        let p = &self.bytes[PARTY_OFFSET..];
        Some(PartyStats {
            status: LittleEndian::read_u32(&p[0..]),
            level: p[4],
            mail_id: p[5],
            current_hp: LittleEndian::read_u16(&p[6..]),
            total_hp: LittleEndian::read_u16(&p[8..]),
            attack: LittleEndian::read_u16(&p[10..]),
            defense: LittleEndian::read_u16(&p[12..]),
            speed: LittleEndian::read_u16(&p[14..]),
            sp_attack: LittleEndian::read_u16(&p[16..]),
            sp_defense: LittleEndian::read_u16(&p[18..]),
        })
    }

    pub fn shiny(&self) -> bool {
        let x = self.personality() ^ self.original_trainer_id();
        ((x >> 16) ^ x) & 0xFFFF < 8
    }

    fn data(&self) -> &[u8] {
        &self.bytes[DATA_OFFSET..PARTY_OFFSET]
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[DATA_OFFSET..PARTY_OFFSET]
    }

    fn order(&self) -> [u8; 4] {
        ORDERS[(self.personality() % 24) as usize]
    }

    fn xor_data(&mut self) {
        let key = self.original_trainer_id() ^ self.personality();
        for word in self.data_mut().chunks_exact_mut(4) {
            let value = LittleEndian::read_u32(word) ^ key;
            LittleEndian::write_u32(word, value);
        }
    }
}

impl CreatureRecord<Encoded> {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ViewError> {
        match bytes.len() {
            BOX_RECORD_SIZE | PARTY_RECORD_SIZE => Ok(Self::with_bytes(bytes.to_vec())),
            len => Err(ViewError::InvalidRecordSize(len)),
        }
    }

    pub fn decode(self) -> CreatureRecord<Decoded> {
        let order = self.order();
        let mut canonical = [[0u8; SUBSTRUCTURE_SIZE]; 4];
        for (position, block) in self.data().chunks_exact(SUBSTRUCTURE_SIZE).enumerate() {
            canonical[order[position] as usize].copy_from_slice(block);
        }
        let mut record = Self::with_bytes::<Decoded>(self.bytes);
        record.data_mut().copy_from_slice(canonical.as_flattened());
        record.xor_data();
        record
    }
}

impl CreatureRecord<Decoded> {
    /// A zeroed record in canonical order, for building saves from scratch.
    pub fn blank(party: bool) -> Self {
        let size = if party {
            PARTY_RECORD_SIZE
        } else {
            BOX_RECORD_SIZE
        };
        Self::with_bytes(vec![0u8; size])
    }

    pub fn encode(mut self) -> CreatureRecord<Encoded> {
        self.xor_data();
        let order = self.order();
        let mut placed = [[0u8; SUBSTRUCTURE_SIZE]; 4];
        for (position, block) in placed.iter_mut().enumerate() {
            block.copy_from_slice(self.substructure(substructure_at(order[position])));
        }
        self.data_mut().copy_from_slice(placed.as_flattened());
        Self::with_bytes::<Encoded>(self.bytes)
    }

    pub fn computed_checksum(&self) -> u16 {
        self.data()
            .chunks_exact(2)
            .map(LittleEndian::read_u16)
            .fold(0u16, u16::wrapping_add)
    }

    /// A mismatch does not make the record unusable; callers report it and
    /// carry on.
    pub fn check(&self) -> Result<(), CreatureChecksumError> {
        let stored = self.stored_checksum();
        let computed = self.computed_checksum();
        if stored == computed {
            Ok(())
        } else {
            Err(CreatureChecksumError { stored, computed })
        }
    }

    pub fn recompute_checksum(&mut self) {
        let checksum = self.computed_checksum();
        LittleEndian::write_u16(&mut self.bytes[CHECKSUM_OFFSET..], checksum);
    }

    /// Changing the personality also changes the permutation applied by
    /// [`CreatureRecord::encode`].
    pub fn set_personality(&mut self, personality: u32) {
        LittleEndian::write_u32(&mut self.bytes[0..], personality);
    }

    pub fn set_original_trainer_id(&mut self, id: u32) {
        LittleEndian::write_u32(&mut self.bytes[4..], id);
    }

    pub fn substructure(&self, which: Substructure) -> &[u8] {
        let start = which as usize * SUBSTRUCTURE_SIZE;
        &self.data()[start..start + SUBSTRUCTURE_SIZE]
    }

    pub fn substructure_mut(&mut self, which: Substructure) -> &mut [u8] {
        let start = which as usize * SUBSTRUCTURE_SIZE;
        &mut self.data_mut()[start..start + SUBSTRUCTURE_SIZE]
    }

    pub fn growth(&self) -> Growth {
        let b = self.substructure(Substructure::Growth);
        Growth {
            species: LittleEndian::read_u16(&b[0..]),
            held_item: LittleEndian::read_u16(&b[2..]),
            experience: LittleEndian::read_u32(&b[4..]),
            pp_bonuses: b[8],
            friendship: b[9],
        }
    }

    pub fn attacks(&self) -> Attacks {
        let b = self.substructure(Substructure::Attacks);
        let mut moves = [0u16; 4];
        LittleEndian::read_u16_into(&b[..8], &mut moves);
        Attacks {
            moves,
            pp: [b[8], b[9], b[10], b[11]],
        }
    }

    pub fn evs_condition(&self) -> EvsCondition {
        let b = self.substructure(Substructure::EvsCondition);
        EvsCondition {
            hp_ev: b[0],
            attack_ev: b[1],
            defense_ev: b[2],
            speed_ev: b[3],
            sp_attack_ev: b[4],
            sp_defense_ev: b[5],
            coolness: b[6],
            beauty: b[7],
            cuteness: b[8],
            smartness: b[9],
            toughness: b[10],
            feel: b[11],
        }
    }

    pub fn misc(&self) -> Misc {
        let b = self.substructure(Substructure::Misc);
        Misc {
            pokerus: b[0],
            met_location: b[1],
            origins_info: LittleEndian::read_u16(&b[2..]),
            iv_egg_ability: LittleEndian::read_u32(&b[4..]),
            ribbons_obedience: LittleEndian::read_u32(&b[8..]),
        }
    }

    pub fn species_internal(&self) -> u16 {
        self.growth().species
    }

    pub fn national_id(&self) -> u16 {
        species::internal_to_national(self.species_internal())
    }

    /// Derived from experience; species growth groups come from the caller.
    pub fn level(&self, rate: GrowthRate) -> u8 {
        rate.level_for_experience(self.growth().experience)
    }

    pub fn generation(&self) -> Option<u8> {
        species::generation(self.national_id())
    }

    pub fn legendary(&self) -> bool {
        species::is_legendary(self.national_id())
    }

    pub fn mythical(&self) -> bool {
        species::is_mythical(self.national_id())
    }

    pub fn starter(&self) -> bool {
        species::is_starter(self.national_id())
    }

    /// Letter index 0..=27 (A..Z, !, ?); `None` for any other species.
    pub fn unown_form(&self) -> Option<u8> {
        (self.national_id() == UNOWN_NATIONAL_ID).then(|| unown_form(self.personality()))
    }
}

fn substructure_at(index: u8) -> Substructure {
    match index {
        0 => Substructure::Growth,
        1 => Substructure::Attacks,
        2 => Substructure::EvsCondition,
        _ => Substructure::Misc,
    }
}

pub fn unown_form(personality: u32) -> u8 {
    let p = personality;
    let letter =
        ((p >> 24) & 3) << 6 | ((p >> 16) & 3) << 4 | ((p >> 8) & 3) << 2 | (p & 3);
    (letter % 28) as u8
}

impl<S> fmt::Debug for CreatureRecord<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatureRecord")
            .field("personality", &format_args!("{:#010x}", self.personality()))
            .field("original_trainer_id", &self.original_trainer_id())
            .field("party", &self.is_party())
            .finish_non_exhaustive()
    }
}
