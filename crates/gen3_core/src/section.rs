use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::checksum::block_checksum;
use crate::error::SectionError;

pub const SECTION_SIZE: usize = 4096;
pub const PAYLOAD_SIZE: usize = 4084;
pub const SECTION_COUNT: usize = 14;
pub const SECTION_SIGNATURE: u32 = 0x0801_2025;

pub const SECTION_ID_OFFSET: usize = 0xFF4;
pub const CHECKSUM_OFFSET: usize = 0xFF6;
pub const SIGNATURE_OFFSET: usize = 0xFF8;
pub const SAVE_INDEX_OFFSET: usize = 0xFFC;

/// Bytes of payload covered by the checksum, indexed by logical id.
pub const SECTION_LENGTHS: [usize; SECTION_COUNT] = [
    3884, 3968, 3968, 3968, 3848, 3968, 3968, 3968, 3968, 3968, 3968, 3968, 3968, 2000,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionKind {
    TrainerInfo,
    TeamItems,
    GameState,
    MiscData,
    RivalInfo,
    PcBufferA,
    PcBufferB,
    PcBufferC,
    PcBufferD,
    PcBufferE,
    PcBufferF,
    PcBufferG,
    PcBufferH,
    PcBufferI,
}

impl SectionKind {
    pub const ALL: [SectionKind; SECTION_COUNT] = [
        Self::TrainerInfo,
        Self::TeamItems,
        Self::GameState,
        Self::MiscData,
        Self::RivalInfo,
        Self::PcBufferA,
        Self::PcBufferB,
        Self::PcBufferC,
        Self::PcBufferD,
        Self::PcBufferE,
        Self::PcBufferF,
        Self::PcBufferG,
        Self::PcBufferH,
        Self::PcBufferI,
    ];

    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn data_len(self) -> usize {
        SECTION_LENGTHS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrainerInfo => "trainer-info",
            Self::TeamItems => "team-items",
            Self::GameState => "game-state",
            Self::MiscData => "misc-data",
            Self::RivalInfo => "rival-info",
            Self::PcBufferA => "pc-buffer-a",
            Self::PcBufferB => "pc-buffer-b",
            Self::PcBufferC => "pc-buffer-c",
            Self::PcBufferD => "pc-buffer-d",
            Self::PcBufferE => "pc-buffer-e",
            Self::PcBufferF => "pc-buffer-f",
            Self::PcBufferG => "pc-buffer-g",
            Self::PcBufferH => "pc-buffer-h",
            Self::PcBufferI => "pc-buffer-i",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One 4 KiB block of a game save: payload followed by a 12-byte trailer.
#[derive(Clone, PartialEq, Eq)]
pub struct Section {
    bytes: Box<[u8; SECTION_SIZE]>,
}

impl Section {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SectionError> {
        let array: [u8; SECTION_SIZE] = bytes
            .try_into()
            .map_err(|_| SectionError::InvalidSize(bytes.len()))?;
        Ok(Self {
            bytes: Box::new(array),
        })
    }

    /// A zeroed section with a correct trailer and checksum.
    pub fn blank(kind: SectionKind, save_index: u32) -> Self {
        let mut section = Self {
            bytes: Box::new([0u8; SECTION_SIZE]),
        };
        section.set_section_id(kind.id());
        section.set_signature(SECTION_SIGNATURE);
        section.set_save_index(save_index);
        section.recompute_checksum();
        section
    }

    pub fn as_bytes(&self) -> &[u8; SECTION_SIZE] {
        &self.bytes
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[..PAYLOAD_SIZE]
    }

    /// Writes here are not reflected in the checksum until
    /// [`Section::recompute_checksum`] runs.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..PAYLOAD_SIZE]
    }

    pub fn section_id(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[SECTION_ID_OFFSET..])
    }

    pub fn set_section_id(&mut self, id: u16) {
        LittleEndian::write_u16(&mut self.bytes[SECTION_ID_OFFSET..], id);
    }

    pub fn kind(&self) -> Option<SectionKind> {
        SectionKind::from_id(self.section_id())
    }

    pub fn checksum(&self) -> u16 {
        LittleEndian::read_u16(&self.bytes[CHECKSUM_OFFSET..])
    }

    pub fn set_checksum(&mut self, checksum: u16) {
        LittleEndian::write_u16(&mut self.bytes[CHECKSUM_OFFSET..], checksum);
    }

    pub fn signature(&self) -> u32 {
        LittleEndian::read_u32(&self.bytes[SIGNATURE_OFFSET..])
    }

    pub fn set_signature(&mut self, signature: u32) {
        LittleEndian::write_u32(&mut self.bytes[SIGNATURE_OFFSET..], signature);
    }

    pub fn save_index(&self) -> u32 {
        LittleEndian::read_u32(&self.bytes[SAVE_INDEX_OFFSET..])
    }

    pub fn set_save_index(&mut self, save_index: u32) {
        LittleEndian::write_u32(&mut self.bytes[SAVE_INDEX_OFFSET..], save_index);
    }

    /// The checksummed prefix of the payload. Empty when the section id is
    /// out of range, since no length is defined for it.
    pub fn data_span(&self) -> &[u8] {
        &self.bytes[..self.data_len()]
    }

    pub fn data_span_mut(&mut self) -> &mut [u8] {
        let len = self.data_len();
        &mut self.bytes[..len]
    }

    fn data_len(&self) -> usize {
        self.kind().map_or(0, SectionKind::data_len)
    }

    pub fn computed_checksum(&self) -> u16 {
        block_checksum(self.data_span())
    }

    pub fn validate(&self) -> Result<(), SectionError> {
        let section_id = self.section_id();
        if SectionKind::from_id(section_id).is_none() {
            return Err(SectionError::UnknownSectionId(section_id));
        }
        let signature = self.signature();
        if signature != SECTION_SIGNATURE {
            return Err(SectionError::BadSignature(signature));
        }
        let stored = self.checksum();
        let computed = self.computed_checksum();
        if stored != computed {
            return Err(SectionError::ChecksumMismatch {
                section_id,
                stored,
                computed,
            });
        }
        Ok(())
    }

    pub fn recompute_checksum(&mut self) {
        let checksum = self.computed_checksum();
        self.set_checksum(checksum);
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("section_id", &self.section_id())
            .field("checksum", &format_args!("{:#06x}", self.checksum()))
            .field("signature", &format_args!("{:#010x}", self.signature()))
            .field("save_index", &self.save_index())
            .finish_non_exhaustive()
    }
}
