use crate::error::{SectionFailure, SlotError};
use crate::section::{SECTION_COUNT, SECTION_SIZE, Section, SectionKind};

pub const GAME_SAVE_SIZE: usize = SECTION_SIZE * SECTION_COUNT;

/// One complete save: 14 sections stored as a rotated ring, so the physical
/// position of a logical section changes from save to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSave {
    sections: Vec<Section>,
}

impl GameSave {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SlotError> {
        if bytes.len() != GAME_SAVE_SIZE {
            return Err(SlotError::InvalidSize(bytes.len()));
        }
        let sections = bytes
            .chunks_exact(SECTION_SIZE)
            .map(Section::from_bytes)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SlotError::InvalidSize(bytes.len()))?;
        Self::from_sections(sections)
    }

    pub fn from_sections(sections: Vec<Section>) -> Result<Self, SlotError> {
        if sections.len() != SECTION_COUNT {
            return Err(SlotError::InvalidSectionCount(sections.len()));
        }
        Ok(Self { sections })
    }

    /// A valid empty save whose first physical section holds logical id
    /// `rotation % 14`.
    pub fn blank(save_index: u32, rotation: usize) -> Self {
        let sections = (0..SECTION_COUNT)
            .map(|i| SectionKind::ALL[(rotation + i) % SECTION_COUNT])
            .map(|kind| Section::blank(kind, save_index))
            .collect();
        Self { sections }
    }

    /// Sections in physical order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// The save index of the physically last section, which is the one the
    /// game writes last.
    pub fn save_index(&self) -> u32 {
        self.sections[SECTION_COUNT - 1].save_index()
    }

    pub fn validate(&self) -> Result<(), SlotError> {
        let failures: Vec<SectionFailure> = self
            .sections
            .iter()
            .enumerate()
            .filter_map(|(physical_index, section)| {
                section.validate().err().map(|error| SectionFailure {
                    physical_index,
                    error,
                })
            })
            .collect();
        if !failures.is_empty() {
            log::debug!("{} of {} sections invalid", failures.len(), SECTION_COUNT);
            return Err(SlotError::Sections(failures));
        }

        for (i, pair) in self.sections.windows(2).enumerate() {
            let expected = (pair[0].section_id() + 1) % SECTION_COUNT as u16;
            let found = pair[1].section_id();
            if found != expected {
                return Err(SlotError::Rotation {
                    physical_index: i + 1,
                    expected,
                    found,
                });
            }
        }

        let expected = self.sections[0].save_index();
        if let Some((physical_index, section)) = self
            .sections
            .iter()
            .enumerate()
            .find(|(_, s)| s.save_index() != expected)
        {
            return Err(SlotError::SaveIndexMismatch {
                physical_index,
                expected,
                found: section.save_index(),
            });
        }

        Ok(())
    }

    /// Physical position of a logical section. Only meaningful once the
    /// rotation invariant holds.
    pub fn physical_index(&self, kind: SectionKind) -> usize {
        let first = (self.sections[0].section_id() as usize) % SECTION_COUNT;
        (SECTION_COUNT - first + kind as usize) % SECTION_COUNT
    }

    pub fn section_by_logical_id(&self, kind: SectionKind) -> &Section {
        &self.sections[self.physical_index(kind)]
    }

    pub fn section_by_logical_id_mut(&mut self, kind: SectionKind) -> &mut Section {
        let index = self.physical_index(kind);
        &mut self.sections[index]
    }

    /// Checksummed spans of logical sections `start..=end` joined in logical
    /// order, wrapping past the last id when `end < start`.
    pub fn sections_contiguous(&self, start: SectionKind, end: SectionKind) -> Vec<u8> {
        let count = (end as usize + SECTION_COUNT - start as usize) % SECTION_COUNT + 1;
        let mut out = Vec::new();
        for step in 0..count {
            let kind = SectionKind::ALL[(start as usize + step) % SECTION_COUNT];
            out.extend_from_slice(self.section_by_logical_id(kind).data_span());
        }
        out
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        for section in &self.sections {
            out.extend_from_slice(section.as_bytes());
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(GAME_SAVE_SIZE);
        self.write_to(&mut out);
        out
    }
}
