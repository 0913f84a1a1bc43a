use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use gen3_core::core_api::{CreatureEntry, CreatureLocation, Engine, Session, SlotState};
use gen3_core::game_version::GameVersion;
use gen3_core::section::SectionKind;
use gen3_render::{
    FieldSelection, JsonStyle, TextRenderOptions, decode_text, render_gift_report_json,
    render_json_full, render_json_selected, render_sheet_with_options, render_validation_json,
};
use serde_json::Value as JsonValue;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.SAV")]
    path: PathBuf,
    /// Overrides the game version read from the save.
    #[arg(long, value_name = "rs|frlg|emerald", value_parser = parse_game_version)]
    game: Option<GameVersion>,
    #[arg(long = "game-name")]
    game_name: bool,
    #[arg(long)]
    slot: bool,
    #[arg(long)]
    name: bool,
    #[arg(long)]
    gender: bool,
    #[arg(long = "trainer-id")]
    trainer_id: bool,
    #[arg(long = "play-time")]
    play_time: bool,
    #[arg(long)]
    pokedex: bool,
    #[arg(long)]
    flags: bool,
    #[arg(long)]
    party: bool,
    #[arg(long)]
    boxes: bool,
    #[arg(long)]
    json: bool,
    #[arg(long, short)]
    verbose: bool,
    /// Validate both slots and exit non-zero if either is corrupt.
    #[arg(long, conflicts_with = "gift")]
    check: bool,
    /// Gift file to transplant into the active slot.
    #[arg(long, value_name = "GIFT.BIN")]
    gift: Option<PathBuf>,
    #[arg(
        long = "gift-target",
        value_name = "SECTION",
        default_value = "rival-info",
        value_parser = parse_section_kind
    )]
    gift_target: SectionKind,
    #[arg(long)]
    output: Option<PathBuf>,
}

fn field_selection(cli: &Cli) -> FieldSelection {
    FieldSelection {
        game: cli.game_name,
        slot: cli.slot,
        name: cli.name,
        gender: cli.gender,
        trainer_id: cli.trainer_id,
        play_time: cli.play_time,
        pokedex: cli.pokedex,
        flags: cli.flags,
        party: cli.party,
        boxes: cli.boxes,
    }
}

fn selected_pairs(fields: &FieldSelection, session: &Session) -> Vec<(String, String)> {
    let snapshot = session.snapshot();
    let mut out = Vec::new();

    if fields.game {
        out.push(("game".to_string(), session.game().to_string()));
    }
    if fields.slot {
        out.push(("slot".to_string(), snapshot.active_slot.to_string()));
        out.push(("save_index".to_string(), snapshot.save_index.to_string()));
    }
    if fields.name {
        out.push(("name".to_string(), decode_text(&snapshot.trainer_name_raw)));
    }
    if fields.gender {
        out.push(("gender".to_string(), snapshot.gender.to_string()));
    }
    if fields.trainer_id {
        out.push(("trainer_id".to_string(), snapshot.public_id.to_string()));
        out.push(("secret_id".to_string(), snapshot.secret_id.to_string()));
    }
    if fields.play_time {
        let t = &snapshot.play_time;
        out.push((
            "play_time".to_string(),
            format!("{}:{:02}:{:02}", t.hours, t.minutes, t.seconds),
        ));
    }
    if fields.pokedex {
        out.push(("pokedex_owned".to_string(), snapshot.pokedex_owned.to_string()));
        out.push(("pokedex_seen".to_string(), snapshot.pokedex_seen.to_string()));
    }
    if fields.flags {
        match session.game_state_flags() {
            Some(flags) => {
                out.push(("mystery_event".to_string(), flags.mystery_event.to_string()));
                out.push(("mystery_gift".to_string(), flags.mystery_gift.to_string()));
                out.push(("eon_ticket".to_string(), flags.eon_ticket.to_string()));
            }
            None => out.push(("flags".to_string(), "unknown".to_string())),
        }
    }
    if fields.party {
        out.push(("party_size".to_string(), session.party().len().to_string()));
        for entry in session.party() {
            out.push(creature_pair(entry));
        }
    }
    if fields.boxes {
        out.push(("boxed".to_string(), session.boxed().len().to_string()));
        for entry in session.boxed() {
            out.push(creature_pair(entry));
        }
    }

    out
}

fn creature_pair(entry: &CreatureEntry) -> (String, String) {
    let key = match entry.location {
        CreatureLocation::Party { index } => format!("party[{index}]"),
        CreatureLocation::Box { pc_box, slot } => format!("box[{pc_box}][{slot}]"),
    };
    let level = match entry.level {
        Some(level) => level.to_string(),
        None => "-".to_string(),
    };
    let value = format!(
        "{} #{:03} lv {}",
        decode_text(&entry.nickname_raw),
        entry.national_id,
        level
    );
    (key, value)
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter(Some("gen3_core"), log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let fields = field_selection(&cli);

    if cli.gift.is_some() && cli.output.is_none() {
        eprintln!("--gift requires --output <PATH>");
        process::exit(2);
    }
    if cli.gift.is_none() && cli.output.is_some() {
        eprintln!("--output requires --gift <PATH>");
        process::exit(2);
    }

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });
    log::debug!("read {} bytes from {}", bytes.len(), cli.path.display());

    let engine = Engine::new();
    let mut session = engine.open_bytes(bytes, cli.game).unwrap_or_else(|e| {
        eprintln!("Error parsing save file: {}", cli.path.display());
        eprintln!("  {}", e);
        process::exit(1);
    });

    if cli.check {
        run_check(&session, cli.json);
        return;
    }

    if let (Some(gift_path), Some(out_path)) = (&cli.gift, &cli.output) {
        let gift_bytes = fs::read(gift_path).unwrap_or_else(|e| {
            eprintln!("Error reading {}: {e}", gift_path.display());
            process::exit(1);
        });
        let report = session
            .apply_gift(&gift_bytes, cli.gift_target)
            .unwrap_or_else(|e| {
                eprintln!("Error applying gift: {e}");
                process::exit(1);
            });
        let patched = session.to_bytes_modified().unwrap_or_else(|e| {
            eprintln!("Error creating modified save bytes: {e}");
            process::exit(1);
        });
        fs::write(out_path, patched).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });

        if cli.json {
            print_json(&render_gift_report_json(&report));
        } else {
            println!(
                "Wrote gift into {} of slot {} ({}) to {}",
                report.section,
                report.slot,
                report.version,
                out_path.display()
            );
        }
        return;
    }

    if cli.json {
        let json = if fields.is_any_selected() {
            render_json_selected(&session, &fields, JsonStyle::CanonicalV1)
        } else {
            render_json_full(&session, JsonStyle::CanonicalV1)
        };
        print_json(&json);
        return;
    }

    if fields.is_any_selected() {
        for (key, value) in selected_pairs(&fields, &session) {
            println!("{key}={value}");
        }
        return;
    }

    print!(
        "{}",
        render_sheet_with_options(
            &session,
            TextRenderOptions {
                verbose: cli.verbose
            }
        )
    );
}

fn run_check(session: &Session, json: bool) {
    let validation = session.validation();
    if json {
        print_json(&render_validation_json(validation));
    } else {
        for summary in [&validation.a, &validation.b] {
            let state = match summary.state {
                SlotState::Unwritten => "unwritten",
                SlotState::Valid => "ok",
                SlotState::Invalid => "INVALID",
            };
            match &summary.error {
                Some(error) => println!("slot {}: {state}: {error}", summary.slot),
                None => println!("slot {}: {state}", summary.slot),
            }
        }
    }
    if !validation.all_valid() {
        process::exit(1);
    }
}

fn print_json(json: &JsonValue) {
    let rendered = serde_json::to_string_pretty(json).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn parse_game_version(value: &str) -> Result<GameVersion, String> {
    match value.to_ascii_lowercase().as_str() {
        "rs" | "ruby" | "sapphire" => Ok(GameVersion::RubySapphire),
        "frlg" | "firered" | "leafgreen" => Ok(GameVersion::LeafGreenFireRed),
        "e" | "emerald" => Ok(GameVersion::Emerald),
        _ => Err(format!(
            "invalid game value '{value}', expected one of: rs, frlg, emerald"
        )),
    }
}

fn parse_section_kind(value: &str) -> Result<SectionKind, String> {
    SectionKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value.to_ascii_lowercase())
        .ok_or_else(|| {
            let names: Vec<&str> = SectionKind::ALL.iter().map(|k| k.as_str()).collect();
            format!(
                "invalid section '{value}', expected one of: {}",
                names.join(", ")
            )
        })
}
