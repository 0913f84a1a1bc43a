mod common;

use gen3_core::core_api::{
    CapabilityIssue, CoreErrorCode, CreatureLocation, Engine, SlotState, ValidationSummary,
};
use gen3_core::file::{SaveFile, SlotId};
use gen3_core::game_version::GameVersion;
use gen3_core::gender::Gender;
use gen3_core::gift::{GIFT_FILE_SIZE, GiftArtifact, GiftLayout, WONDER_CARD_SIZE};
use gen3_core::layout::{SLOT_A, SLOT_B};
use gen3_core::section::{SECTION_SIZE, SectionKind};

use common::{TRAINER_ID, TRAINER_NAME, gift_bytes, save_bytes, save_file};

#[test]
fn engine_reads_latest_slot() {
    let engine = Engine::new();
    let bytes = save_bytes(GameVersion::Emerald, 5, 7);

    let session = engine
        .open_bytes(&bytes, None)
        .expect("failed to open emerald save");

    assert_eq!(session.game(), GameVersion::Emerald);
    assert_eq!(session.active_slot(), SlotId::B);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.save_index, 7);
    assert_eq!(snapshot.trainer_name_raw, TRAINER_NAME);
    assert_eq!(snapshot.gender, Gender::Male);
    assert_eq!(snapshot.public_id, TRAINER_ID as u16);
    assert_eq!(snapshot.secret_id, 2);
    assert_eq!(snapshot.play_time.hours, 42);
    assert_eq!(snapshot.pokedex_owned, 3);
    assert_eq!(snapshot.pokedex_seen, 4);
    assert_eq!(session.pokedex_owned_count(), 3);
    assert_eq!(snapshot.party_size, 1);
    assert_eq!(snapshot.boxed_count, 1);

    let caps = session.capabilities();
    assert!(caps.can_query);
    assert!(caps.can_apply_gift);
    assert!(caps.issues.is_empty());
    assert!(session.validation().all_valid());
    assert_eq!(session.game_state_flags().map(|f| f.eon_ticket), Some(false));
}

#[test]
fn engine_decodes_party_and_boxes() {
    let session = Engine::new()
        .open_bytes(save_bytes(GameVersion::LeafGreenFireRed, 9, 8), None)
        .unwrap();
    assert_eq!(session.game(), GameVersion::LeafGreenFireRed);
    assert_eq!(session.active_slot(), SlotId::A);

    let party = session.party();
    assert_eq!(party.len(), 1);
    assert_eq!(party[0].location, CreatureLocation::Party { index: 0 });
    assert_eq!(party[0].personality, 0x1234_5678);
    assert_eq!(party[0].national_id, 25);
    assert_eq!(party[0].experience, 1000);
    assert_eq!(party[0].level, Some(12));
    assert_eq!(party[0].original_trainer_id, TRAINER_ID);
    assert_eq!(party[0].nickname_raw[..3], [0xCA, 0xC3, 0xC5]);
    assert_eq!(party[0].generation, Some(1));
    assert!(party[0].checksum_valid);

    let boxed = session.boxed();
    assert_eq!(boxed.len(), 1);
    assert_eq!(boxed[0].location, CreatureLocation::Box { pc_box: 2, slot: 3 });
    assert_eq!(boxed[0].national_id, 1);
    assert_eq!(boxed[0].level, None);
    assert!(boxed[0].starter);
    assert!(!boxed[0].legendary);
}

#[test]
fn hint_overrides_detected_version() {
    let bytes = save_bytes(GameVersion::Emerald, 1, 2);
    let session = Engine::new()
        .open_bytes(&bytes, Some(GameVersion::RubySapphire))
        .unwrap();
    assert_eq!(session.game(), GameVersion::RubySapphire);
    // Emerald and ruby/sapphire share the team offsets.
    assert_eq!(session.party().len(), 1);
    assert!(!session.capabilities().can_apply_gift);
    assert!(
        session
            .capabilities()
            .issues
            .contains(&CapabilityIssue::GiftStorageUnavailable)
    );
}

#[test]
fn corrupt_latest_slot_falls_back_to_older() {
    let mut bytes = save_bytes(GameVersion::Emerald, 5, 7);
    bytes[SLOT_B.start + 100] ^= 0xFF;

    let session = Engine::new().open_bytes(&bytes, None).unwrap();
    assert_eq!(session.active_slot(), SlotId::A);
    assert_eq!(session.snapshot().save_index, 5);
    assert!(
        session
            .capabilities()
            .issues
            .contains(&CapabilityIssue::SlotFallback)
    );

    let validation = session.validation();
    assert_eq!(validation.latest, SlotId::B);
    assert_eq!(validation.a.state, SlotState::Valid);
    assert_eq!(validation.b.state, SlotState::Invalid);
    assert!(validation.b.error.is_some());
    assert!(!validation.all_valid());
}

#[test]
fn no_valid_slot_is_an_error() {
    let mut bytes = save_bytes(GameVersion::Emerald, 5, 7);
    bytes[SLOT_A.start + 100] ^= 0xFF;
    bytes[SLOT_B.start + 100] ^= 0xFF;

    let err = Engine::new().open_bytes(&bytes, None).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Checksum);
}

#[test]
fn wrong_file_size_is_a_format_error() {
    let err = Engine::new().open_bytes(vec![0u8; 1000], None).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Format);
}

#[test]
fn creature_checksum_mismatch_is_reported_not_fatal() {
    let mut file = save_file(GameVersion::Emerald, 1, 2);
    let save = file.slot_mut(SlotId::B);
    let team = save.section_by_logical_id_mut(SectionKind::TeamItems);
    // Stored checksum of the first party member.
    team.payload_mut()[0x238 + 0x1C] ^= 0x01;
    team.recompute_checksum();

    let session = Engine::new().open_bytes(file.to_bytes(), None).unwrap();
    assert!(!session.party()[0].checksum_valid);
    assert!(
        session
            .capabilities()
            .issues
            .contains(&CapabilityIssue::CreatureChecksumMismatch)
    );
}

#[test]
fn unmodified_bytes_round_trip() {
    let mut bytes = save_bytes(GameVersion::Emerald, 5, 7);
    // Trailing regions are carried through untouched.
    let last = bytes.len() - 1;
    bytes[last] = 0xAB;

    let session = Engine::new().open_bytes(&bytes, None).unwrap();
    assert_eq!(session.to_bytes_unmodified().unwrap(), bytes);
    assert_eq!(session.to_bytes_modified().unwrap(), bytes);
}

#[test]
fn session_types_serialize() {
    let session = Engine::new()
        .open_bytes(save_bytes(GameVersion::Emerald, 5, 7), None)
        .unwrap();

    let snapshot = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(snapshot["game"], "Emerald");
    assert_eq!(snapshot["active_slot"], "B");
    assert_eq!(snapshot["save_index"], 7);

    let validation = serde_json::to_string(session.validation()).unwrap();
    assert_eq!(
        serde_json::from_str::<ValidationSummary>(&validation).unwrap(),
        *session.validation()
    );

    let entry = serde_json::to_value(&session.party()[0]).unwrap();
    assert_eq!(entry["location"]["Party"]["index"], 0);
    assert_eq!(entry["personality"], 0x12345678);
}

fn apply_gift_at(version: GameVersion, expected: GiftLayout) {
    let bytes = save_bytes(version, 5, 7);
    let mut session = Engine::new().open_bytes(&bytes, None).unwrap();
    let gift = gift_bytes(0x0F0F);

    let report = session
        .apply_gift(&gift, SectionKind::RivalInfo)
        .expect("gift transplant failed");
    assert_eq!(report.slot, SlotId::B);
    assert_eq!(report.version, version);
    assert_eq!(report.layout, expected);
    assert_ne!(report.checksum_before, report.checksum_after);
    assert!(session.validation().all_valid());

    let out = session.to_bytes_modified().unwrap();
    let file = SaveFile::parse(&out).unwrap();
    file.validate().unwrap();
    let section = file
        .slot(SlotId::B)
        .section_by_logical_id(SectionKind::RivalInfo);
    let payload = section.payload();
    let card = expected.wonder_card;
    assert_eq!(payload[card..card + WONDER_CARD_SIZE], gift[..WONDER_CARD_SIZE]);
    assert_eq!(payload[expected.icon()..expected.icon() + 2], [0x97, 0x01]);
    assert_eq!(
        payload[expected.event_script..expected.end()],
        gift[GiftLayout::FILE.event_script..GIFT_FILE_SIZE]
    );
    assert_eq!(section.checksum(), report.checksum_after);

    let stored = GiftArtifact::from_save(file.slot(SlotId::B), SectionKind::RivalInfo, expected)
        .unwrap();
    assert_eq!(stored.to_bytes(), gift);

    // Only the target section of the active slot changed.
    let physical = file.slot(SlotId::B).physical_index(SectionKind::RivalInfo);
    let changed = SLOT_B.start + physical * SECTION_SIZE;
    for (i, (before, after)) in bytes.iter().zip(&out).enumerate() {
        if before != after {
            assert!(
                (changed..changed + SECTION_SIZE).contains(&i),
                "byte {i:#x} changed outside the target section"
            );
        }
    }
}

#[test]
fn apply_gift_emerald_offsets() {
    apply_gift_at(GameVersion::Emerald, GiftLayout::EMERALD);
}

#[test]
fn apply_gift_frlg_offsets() {
    apply_gift_at(GameVersion::LeafGreenFireRed, GiftLayout::FRLG);
}

#[test]
fn apply_gift_rejected_for_ruby_sapphire() {
    let bytes = save_bytes(GameVersion::RubySapphire, 5, 7);
    let mut session = Engine::new().open_bytes(&bytes, None).unwrap();
    let err = session
        .apply_gift(&gift_bytes(1), SectionKind::RivalInfo)
        .unwrap_err();
    assert_eq!(err.code, CoreErrorCode::UnsupportedOperation);
    assert_eq!(session.to_bytes_modified().unwrap(), bytes);
}

#[test]
fn apply_gift_rejects_bad_gift_files() {
    let bytes = save_bytes(GameVersion::Emerald, 5, 7);
    let mut session = Engine::new().open_bytes(&bytes, None).unwrap();

    let mut gift = gift_bytes(1);
    gift[500] ^= 0xFF;
    let err = session.apply_gift(&gift, SectionKind::RivalInfo).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Checksum);

    let err = session
        .apply_gift(&gift[..1388], SectionKind::RivalInfo)
        .unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Format);

    assert_eq!(session.to_bytes_modified().unwrap(), bytes);
}

#[test]
fn apply_gift_into_too_small_section_is_unsupported() {
    let bytes = save_bytes(GameVersion::Emerald, 5, 7);
    let mut session = Engine::new().open_bytes(&bytes, None).unwrap();
    let err = session
        .apply_gift(&gift_bytes(1), SectionKind::PcBufferI)
        .unwrap_err();
    assert_eq!(err.code, CoreErrorCode::UnsupportedOperation);
}

fn gift_with_corrupt_inactive_slot(a_index: u32, b_index: u32, expect_fallback: bool) {
    let mut bytes = save_bytes(GameVersion::Emerald, a_index, b_index);
    bytes[SLOT_B.start + 100] ^= 0xFF;

    let mut session = Engine::new().open_bytes(&bytes, None).unwrap();
    assert_eq!(session.active_slot(), SlotId::A);
    assert_eq!(
        session
            .capabilities()
            .issues
            .contains(&CapabilityIssue::SlotFallback),
        expect_fallback
    );

    let gift = gift_bytes(0x0202);
    let report = session.apply_gift(&gift, SectionKind::RivalInfo).unwrap();
    assert_eq!(report.slot, SlotId::A);
    assert_eq!(session.validation().a.state, SlotState::Valid);
    assert_eq!(session.validation().b.state, SlotState::Invalid);

    let out = session
        .to_bytes_modified()
        .expect("patched save with a corrupt inactive slot should serialize");
    assert_eq!(out[SLOT_B.start..SLOT_B.end], bytes[SLOT_B.start..SLOT_B.end]);
    assert_ne!(out[SLOT_A.start..SLOT_A.end], bytes[SLOT_A.start..SLOT_A.end]);

    let file = SaveFile::parse(&out).unwrap();
    file.slot(SlotId::A).validate().unwrap();
    let stored =
        GiftArtifact::from_save(file.slot(SlotId::A), SectionKind::RivalInfo, GiftLayout::EMERALD)
            .unwrap();
    assert_eq!(stored.to_bytes(), gift);
}

#[test]
fn apply_gift_after_slot_fallback() {
    gift_with_corrupt_inactive_slot(5, 7, true);
}

#[test]
fn apply_gift_with_corrupt_backup_slot() {
    gift_with_corrupt_inactive_slot(7, 5, false);
}

#[test]
fn modified_bytes_keep_the_inactive_slot_untouched() {
    let bytes = save_bytes(GameVersion::Emerald, 7, 5);
    let session = Engine::new().open_bytes(&bytes, None).unwrap();
    assert_eq!(session.active_slot(), SlotId::A);
    assert_eq!(session.to_bytes_modified().unwrap(), bytes);
}
