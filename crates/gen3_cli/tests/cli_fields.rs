use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use gen3_core::file::{SaveFile, SlotId};
use gen3_core::gift::{EventScript, GiftArtifact, GiftLayout, WONDER_CARD_SIZE, WonderCard};
use gen3_core::layout::SLOT_A;
use gen3_core::section::SectionKind;
use gen3_core::slot::GameSave;
use serde_json::Value;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gen3-se"))
        .args(args)
        .output()
        .expect("failed to run gen3-se CLI")
}

fn temp_output_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.sav", std::process::id(), nanos))
}

fn game_save(game_code: u8, save_index: u32) -> GameSave {
    let mut save = GameSave::blank(save_index, 2);
    let trainer = save.section_by_logical_id_mut(SectionKind::TrainerInfo);
    let p = trainer.payload_mut();
    // "RED"
    p[0..4].copy_from_slice(&[0xCC, 0xBF, 0xBE, 0xFF]);
    p[0x0A..0x0E].copy_from_slice(&31337u32.to_le_bytes());
    p[0x0E..0x10].copy_from_slice(&12u16.to_le_bytes());
    p[0x10] = 34;
    p[0x11] = 56;
    p[0xAC] = game_code;
    trainer.recompute_checksum();
    save
}

fn write_save(prefix: &str, game_code: u8) -> PathBuf {
    let file = SaveFile::blank(game_save(game_code, 3), game_save(game_code, 4));
    let path = temp_output_path(prefix);
    fs::write(&path, file.to_bytes()).expect("failed to write fixture save");
    path
}

fn write_gift(prefix: &str) -> (PathBuf, Vec<u8>) {
    let mut wonder_card = WonderCard::blank();
    wonder_card.set_event_id(0x0042);
    wonder_card.recompute_checksum();
    let mut event_script = EventScript::blank();
    event_script.script_mut()[0] = 0x33;
    event_script.recompute_checksum();
    let bytes = GiftArtifact {
        wonder_card,
        icon: 7,
        event_script,
    }
    .to_bytes();
    let path = temp_output_path(prefix);
    fs::write(&path, &bytes).expect("failed to write fixture gift");
    (path, bytes)
}

#[test]
fn cli_prints_requested_fields_in_fixed_order() {
    let path = write_save("gen3_fields", 1);
    let output = run_cli(&["--play-time", "--name", "--trainer-id", path.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["name=RED", "trainer_id=31337", "secret_id=0", "play_time=12:34:56"]
    );
    let _ = fs::remove_file(path);
}

#[test]
fn cli_game_flag_overrides_detection() {
    let path = write_save("gen3_hint", 1);
    let path_str = path.to_str().unwrap();

    let output = run_cli(&["--game-name", path_str]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "game=leaf green/fire red");

    let output = run_cli(&["--game", "emerald", "--game-name", path_str]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "game=emerald");

    let output = run_cli(&["--game", "gsc", path_str]);
    assert!(!output.status.success());
    let _ = fs::remove_file(path);
}

#[test]
fn cli_json_output_is_parseable() {
    let path = write_save("gen3_json", 2);
    let output = run_cli(&["--json", path.to_str().unwrap()]);
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(json["game"], "Emerald");
    assert_eq!(json["slot"], "b");
    assert_eq!(json["save_index"], 4);
    assert_eq!(json["name"], "RED");
    assert_eq!(json["party"], Value::Array(Vec::new()));
    let _ = fs::remove_file(path);
}

#[test]
fn cli_sheet_without_field_flags() {
    let path = write_save("gen3_sheet", 2);
    let output = run_cli(&[path.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("EMERALD"));
    assert!(stdout.contains("Name: RED"));
    assert!(stdout.contains(" ::: Validation :::"));
    let _ = fs::remove_file(path);
}

#[test]
fn cli_check_fails_on_corrupt_slot() {
    let path = write_save("gen3_check", 2);
    let output = run_cli(&["--check", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("slot a: ok"));

    let mut bytes = fs::read(&path).unwrap();
    bytes[SLOT_A.start + 10] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    let output = run_cli(&["--check", "--json", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(json["valid"], false);
    assert_eq!(json["a"]["state"], "invalid");
    assert_eq!(json["a"]["error_kind"], "Checksum");
    assert_eq!(json["b"]["state"], "valid");
    let _ = fs::remove_file(path);
}

#[test]
fn cli_writes_gift_to_output() {
    let save_path = write_save("gen3_gift_save", 1);
    let (gift_path, gift) = write_gift("gen3_gift");
    let out_path = temp_output_path("gen3_gift_out");

    let output = run_cli(&[
        "--gift",
        gift_path.to_str().unwrap(),
        "--gift-target",
        "game-state",
        "--output",
        out_path.to_str().unwrap(),
        "--json",
        save_path.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(report["section"], "game-state");
    assert_eq!(report["slot"], "b");
    assert_eq!(report["wonder_card_offset"], 1120);

    let original = fs::read(&save_path).unwrap();
    let written = fs::read(&out_path).unwrap();
    assert_eq!(written.len(), original.len());
    let file = SaveFile::parse(&written).unwrap();
    file.validate().unwrap();
    let payload = file
        .slot(SlotId::B)
        .section_by_logical_id(SectionKind::GameState)
        .payload();
    let card = GiftLayout::FRLG.wonder_card;
    assert_eq!(payload[card..card + WONDER_CARD_SIZE], gift[..WONDER_CARD_SIZE]);
    // Slot a is untouched.
    assert_eq!(written[SLOT_A.start..SLOT_A.end], original[SLOT_A.start..SLOT_A.end]);

    for path in [save_path, gift_path, out_path] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn cli_gift_requires_output_and_supported_game() {
    let save_path = write_save("gen3_gift_rs", 0);
    let (gift_path, _) = write_gift("gen3_gift_rs_gift");

    let output = run_cli(&["--gift", gift_path.to_str().unwrap(), save_path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));

    let out_path = temp_output_path("gen3_gift_rs_out");
    let output = run_cli(&[
        "--gift",
        gift_path.to_str().unwrap(),
        "--output",
        out_path.to_str().unwrap(),
        save_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error applying gift"));
    assert!(!out_path.exists());

    for path in [save_path, gift_path] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn cli_writes_gift_when_backup_slot_is_corrupt() {
    let file = SaveFile::blank(game_save(0x40, 3), game_save(0x40, 4));
    let mut original = file.to_bytes();
    original[SLOT_A.start + 100] ^= 0xFF;
    let save_path = temp_output_path("gen3_gift_corrupt_backup");
    fs::write(&save_path, &original).expect("failed to write fixture save");
    let (gift_path, _) = write_gift("gen3_gift_corrupt_backup_gift");
    let out_path = temp_output_path("gen3_gift_corrupt_backup_out");

    let output = run_cli(&[
        "--gift",
        gift_path.to_str().unwrap(),
        "--output",
        out_path.to_str().unwrap(),
        "--json",
        save_path.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(report["slot"], "b");
    assert_eq!(report["section"], "rival-info");

    let written = fs::read(&out_path).unwrap();
    assert_eq!(written[SLOT_A.start..SLOT_A.end], original[SLOT_A.start..SLOT_A.end]);
    let parsed = SaveFile::parse(&written).unwrap();
    parsed.slot(SlotId::B).validate().unwrap();

    let _ = fs::remove_file(save_path);
    let _ = fs::remove_file(gift_path);
    let _ = fs::remove_file(out_path);
}
