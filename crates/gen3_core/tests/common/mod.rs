#![allow(dead_code)]

use gen3_core::creature::{CreatureRecord, Decoded, Encoded, PARTY_RECORD_SIZE, Substructure};
use gen3_core::file::SaveFile;
use gen3_core::game_version::GameVersion;
use gen3_core::gift::{EventScript, GiftArtifact, WonderCard};
use gen3_core::section::SectionKind;
use gen3_core::slot::GameSave;
use gen3_core::views::Party;

pub const TRAINER_ID: u32 = 0x0002_3039;
/// "ASH" in the game charset.
pub const TRAINER_NAME: [u8; 7] = [0xBB, 0xCD, 0xC2, 0xFF, 0xFF, 0xFF, 0xFF];

pub fn version_code(version: GameVersion) -> u8 {
    match version {
        GameVersion::RubySapphire => 0,
        GameVersion::LeafGreenFireRed => 1,
        GameVersion::Emerald => 0x5A,
    }
}

pub fn creature(personality: u32, species: u16, experience: u32, party: bool) -> CreatureRecord<Encoded> {
    let mut record = CreatureRecord::<Decoded>::blank(party);
    record.set_personality(personality);
    record.set_original_trainer_id(TRAINER_ID);
    let growth = record.substructure_mut(Substructure::Growth);
    growth[0..2].copy_from_slice(&species.to_le_bytes());
    growth[4..8].copy_from_slice(&experience.to_le_bytes());
    record.recompute_checksum();
    let mut bytes = record.encode().as_bytes().to_vec();
    bytes[0x08..0x0B].copy_from_slice(&[0xCA, 0xC3, 0xC5]);
    if party {
        bytes[PARTY_RECORD_SIZE - 16] = 12;
    }
    CreatureRecord::<Encoded>::from_bytes(&bytes).unwrap()
}

/// A consistent slot with a named trainer, one party member and one boxed
/// creature in box 2, slot 3.
pub fn game_save(version: GameVersion, save_index: u32, rotation: usize) -> GameSave {
    let mut save = GameSave::blank(save_index, rotation);

    let trainer = save.section_by_logical_id_mut(SectionKind::TrainerInfo);
    let p = trainer.payload_mut();
    p[0..7].copy_from_slice(&TRAINER_NAME);
    p[0x0A..0x0E].copy_from_slice(&TRAINER_ID.to_le_bytes());
    p[0x0E..0x10].copy_from_slice(&42u16.to_le_bytes());
    p[0x28] = 0b0000_0111;
    p[0x5C] = 0b0000_1111;
    p[0xAC] = version_code(version);
    trainer.recompute_checksum();

    let team = save.section_by_logical_id_mut(SectionKind::TeamItems);
    Party::write(team, version, &[creature(0x1234_5678, 25, 1000, true)]).unwrap();
    team.recompute_checksum();

    // Box 2, slot 3 is record 63: 4 + 63 * 80 = 5044, past buffer A's 3968.
    let buffer_b = save.section_by_logical_id_mut(SectionKind::PcBufferB);
    let boxed = creature(0x0BAD_CAFE, 1, 135, false);
    buffer_b.payload_mut()[1076..1156].copy_from_slice(boxed.as_bytes());
    buffer_b.recompute_checksum();

    save
}

pub fn save_file(version: GameVersion, a_index: u32, b_index: u32) -> SaveFile {
    SaveFile::blank(
        game_save(version, a_index, 3),
        game_save(version, b_index, 11),
    )
}

pub fn save_bytes(version: GameVersion, a_index: u32, b_index: u32) -> Vec<u8> {
    save_file(version, a_index, b_index).to_bytes()
}

pub fn gift(event_id: u16) -> GiftArtifact {
    let mut wonder_card = WonderCard::blank();
    wonder_card.set_event_id(event_id);
    wonder_card.title_raw_mut()[0..4].copy_from_slice(&[0xC1, 0xC3, 0xC0, 0xCE]);
    wonder_card.recompute_checksum();

    let mut event_script = EventScript::blank();
    for (i, byte) in event_script.script_mut().iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }
    event_script.recompute_checksum();

    GiftArtifact {
        wonder_card,
        icon: 0x0197,
        event_script,
    }
}

pub fn gift_bytes(event_id: u16) -> Vec<u8> {
    gift(event_id).to_bytes()
}
