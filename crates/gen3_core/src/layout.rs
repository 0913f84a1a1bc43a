use std::io;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionId {
    SlotA,
    SlotB,
    HallOfFame,
    GiftStaging,
    BattleLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLayout {
    pub id: RegionId,
    pub range: ByteRange,
}

pub const SLOT_SIZE: usize = 0xE000;
pub const HALL_OF_FAME_SIZE: usize = 8192;
pub const GIFT_STAGING_SIZE: usize = 4096;
pub const BATTLE_LOG_SIZE: usize = 4096;
pub const SAVE_FILE_SIZE: usize = 0x20000;

pub const SLOT_A: ByteRange = ByteRange::new(0, SLOT_SIZE);
pub const SLOT_B: ByteRange = ByteRange::new(SLOT_A.end, SLOT_SIZE);
pub const HALL_OF_FAME: ByteRange = ByteRange::new(SLOT_B.end, HALL_OF_FAME_SIZE);
pub const GIFT_STAGING: ByteRange = ByteRange::new(HALL_OF_FAME.end, GIFT_STAGING_SIZE);
pub const BATTLE_LOG: ByteRange = ByteRange::new(GIFT_STAGING.end, BATTLE_LOG_SIZE);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLayout {
    pub file_len: usize,
    pub regions: Vec<RegionLayout>,
}

impl FileLayout {
    /// The fixed region table of a 128 KiB save.
    pub fn standard() -> Self {
        let regions = [
            (RegionId::SlotA, SLOT_A),
            (RegionId::SlotB, SLOT_B),
            (RegionId::HallOfFame, HALL_OF_FAME),
            (RegionId::GiftStaging, GIFT_STAGING),
            (RegionId::BattleLog, BATTLE_LOG),
        ]
        .into_iter()
        .map(|(id, range)| RegionLayout { id, range })
        .collect();
        Self {
            file_len: SAVE_FILE_SIZE,
            regions,
        }
    }

    pub fn region(&self, id: RegionId) -> Option<ByteRange> {
        self.regions.iter().find(|r| r.id == id).map(|r| r.range)
    }

    /// Regions must follow one another from byte 0 to `file_len` with no gap
    /// or overlap.
    pub fn validate(&self) -> io::Result<()> {
        if self.regions.is_empty() {
            return Err(invalid_data("file layout has no regions".to_string()));
        }

        let mut cursor = 0usize;
        for region in &self.regions {
            let ByteRange { start, end } = region.range;
            if start != cursor {
                return Err(invalid_data(format!(
                    "{:?} starts at {start:#x}, expected {cursor:#x}",
                    region.id
                )));
            }
            if end < start {
                return Err(invalid_data(format!(
                    "{:?} ends before it starts ({start:#x}..{end:#x})",
                    region.id
                )));
            }
            cursor = end;
        }

        if cursor != self.file_len {
            return Err(invalid_data(format!(
                "regions end at {cursor:#x}, file is {:#x} bytes",
                self.file_len
            )));
        }
        Ok(())
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
