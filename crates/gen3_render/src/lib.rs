use std::fmt::Write as _;

use gen3_core::core_api::{
    CreatureEntry, CreatureLocation, Session, SlotState, SlotSummary, ValidationSummary,
};
use gen3_core::game_version::GameVersion;
use gen3_core::gift::TransplantReport;
use gen3_core::views::PlayTime;
use serde_json::{Map as JsonMap, Value as JsonValue};

pub mod charset;

pub use charset::decode_text;

const SHEET_WIDTH: usize = 76;
const NICKNAME_COL_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// Adds personality values and move ids to creature lines.
    pub verbose: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub game: bool,
    pub slot: bool,
    pub name: bool,
    pub gender: bool,
    pub trainer_id: bool,
    pub play_time: bool,
    pub pokedex: bool,
    pub flags: bool,
    pub party: bool,
    pub boxes: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.game
            || self.slot
            || self.name
            || self.gender
            || self.trainer_id
            || self.play_time
            || self.pokedex
            || self.flags
            || self.party
            || self.boxes
    }
}

pub fn render_json_full(session: &Session, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(session)),
    }
}

pub fn render_json_selected(
    session: &Session,
    fields: &FieldSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(selected_json(fields, session)),
    }
}

pub fn render_validation_json(summary: &ValidationSummary) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("valid".to_string(), JsonValue::from(summary.all_valid()));
    out.insert(
        "latest".to_string(),
        JsonValue::String(summary.latest.to_string()),
    );
    out.insert("a".to_string(), slot_summary_to_json(&summary.a));
    out.insert("b".to_string(), slot_summary_to_json(&summary.b));
    JsonValue::Object(out)
}

pub fn render_gift_report_json(report: &TransplantReport) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("slot".to_string(), JsonValue::String(report.slot.to_string()));
    out.insert(
        "game".to_string(),
        JsonValue::String(game_key(report.version).to_string()),
    );
    out.insert(
        "section".to_string(),
        JsonValue::String(report.section.to_string()),
    );
    out.insert(
        "wonder_card_offset".to_string(),
        JsonValue::from(report.layout.wonder_card),
    );
    out.insert(
        "event_script_offset".to_string(),
        JsonValue::from(report.layout.event_script),
    );
    out.insert(
        "checksum_before".to_string(),
        JsonValue::String(format!("{:#06x}", report.checksum_before)),
    );
    out.insert(
        "checksum_after".to_string(),
        JsonValue::String(format!("{:#06x}", report.checksum_after)),
    );
    JsonValue::Object(out)
}

pub fn render_sheet(session: &Session) -> String {
    render_sheet_with_options(session, TextRenderOptions::default())
}

pub fn render_sheet_with_options(session: &Session, options: TextRenderOptions) -> String {
    render_sheet_impl(session, options)
}

fn selected_json(fields: &FieldSelection, session: &Session) -> JsonMap<String, JsonValue> {
    let snapshot = session.snapshot();
    let mut out = JsonMap::new();

    if fields.game {
        out.insert(
            "game".to_string(),
            JsonValue::String(game_key(session.game()).to_string()),
        );
    }
    if fields.slot {
        out.insert(
            "slot".to_string(),
            JsonValue::String(snapshot.active_slot.to_string()),
        );
        out.insert("save_index".to_string(), JsonValue::from(snapshot.save_index));
    }
    if fields.name {
        out.insert(
            "name".to_string(),
            JsonValue::String(decode_text(&snapshot.trainer_name_raw)),
        );
    }
    if fields.gender {
        out.insert(
            "gender".to_string(),
            JsonValue::String(snapshot.gender.to_string()),
        );
    }
    if fields.trainer_id {
        out.insert("trainer_id".to_string(), JsonValue::from(snapshot.public_id));
        out.insert("secret_id".to_string(), JsonValue::from(snapshot.secret_id));
    }
    if fields.play_time {
        out.insert(
            "play_time".to_string(),
            JsonValue::String(format_play_time(&snapshot.play_time)),
        );
    }
    if fields.pokedex {
        out.insert(
            "pokedex_owned".to_string(),
            JsonValue::from(snapshot.pokedex_owned),
        );
        out.insert(
            "pokedex_seen".to_string(),
            JsonValue::from(snapshot.pokedex_seen),
        );
    }
    if fields.flags {
        out.insert("flags".to_string(), flags_to_json(session));
    }
    if fields.party {
        out.insert("party".to_string(), creatures_to_json(session.party()));
    }
    if fields.boxes {
        out.insert("boxes".to_string(), creatures_to_json(session.boxed()));
    }

    out
}

fn default_json(session: &Session) -> JsonMap<String, JsonValue> {
    let snapshot = session.snapshot();
    let mut out = JsonMap::new();

    out.insert(
        "game".to_string(),
        JsonValue::String(game_key(session.game()).to_string()),
    );
    out.insert(
        "slot".to_string(),
        JsonValue::String(snapshot.active_slot.to_string()),
    );
    out.insert("save_index".to_string(), JsonValue::from(snapshot.save_index));
    out.insert(
        "name".to_string(),
        JsonValue::String(decode_text(&snapshot.trainer_name_raw)),
    );
    out.insert(
        "gender".to_string(),
        JsonValue::String(snapshot.gender.to_string()),
    );
    out.insert("trainer_id".to_string(), JsonValue::from(snapshot.public_id));
    out.insert("secret_id".to_string(), JsonValue::from(snapshot.secret_id));
    out.insert(
        "play_time".to_string(),
        JsonValue::String(format_play_time(&snapshot.play_time)),
    );
    out.insert(
        "pokedex_owned".to_string(),
        JsonValue::from(snapshot.pokedex_owned),
    );
    out.insert(
        "pokedex_seen".to_string(),
        JsonValue::from(snapshot.pokedex_seen),
    );
    out.insert("current_box".to_string(), JsonValue::from(snapshot.current_box));
    out.insert("flags".to_string(), flags_to_json(session));
    out.insert("party".to_string(), creatures_to_json(session.party()));
    out.insert("boxes".to_string(), creatures_to_json(session.boxed()));
    out.insert(
        "validation".to_string(),
        render_validation_json(session.validation()),
    );
    out.insert(
        "issues".to_string(),
        JsonValue::Array(
            session
                .capabilities()
                .issues
                .iter()
                .map(|issue| JsonValue::String(format!("{issue:?}")))
                .collect(),
        ),
    );

    out
}

fn game_key(game: GameVersion) -> &'static str {
    match game {
        GameVersion::RubySapphire => "RubySapphire",
        GameVersion::LeafGreenFireRed => "LeafGreenFireRed",
        GameVersion::Emerald => "Emerald",
    }
}

fn flags_to_json(session: &Session) -> JsonValue {
    match session.game_state_flags() {
        Some(flags) => {
            let mut m = JsonMap::new();
            m.insert(
                "mystery_event".to_string(),
                JsonValue::from(flags.mystery_event),
            );
            m.insert(
                "mystery_gift".to_string(),
                JsonValue::from(flags.mystery_gift),
            );
            m.insert("eon_ticket".to_string(), JsonValue::from(flags.eon_ticket));
            JsonValue::Object(m)
        }
        None => JsonValue::Null,
    }
}

fn creatures_to_json(entries: &[CreatureEntry]) -> JsonValue {
    JsonValue::Array(entries.iter().map(creature_to_json).collect())
}

fn creature_to_json(c: &CreatureEntry) -> JsonValue {
    let mut m = JsonMap::new();
    match c.location {
        CreatureLocation::Party { index } => {
            m.insert("party_index".to_string(), JsonValue::from(index));
        }
        CreatureLocation::Box { pc_box, slot } => {
            m.insert("box".to_string(), JsonValue::from(pc_box));
            m.insert("box_slot".to_string(), JsonValue::from(slot));
        }
    }
    m.insert("species".to_string(), JsonValue::from(c.national_id));
    m.insert(
        "species_internal".to_string(),
        JsonValue::from(c.species_internal),
    );
    m.insert(
        "nickname".to_string(),
        JsonValue::String(decode_text(&c.nickname_raw)),
    );
    m.insert(
        "ot_name".to_string(),
        JsonValue::String(decode_text(&c.original_trainer_name_raw)),
    );
    m.insert(
        "ot_id".to_string(),
        JsonValue::from(c.original_trainer_id as u16),
    );
    m.insert(
        "level".to_string(),
        match c.level {
            Some(v) => JsonValue::from(v),
            None => JsonValue::Null,
        },
    );
    m.insert("experience".to_string(), JsonValue::from(c.experience));
    m.insert("held_item".to_string(), JsonValue::from(c.held_item));
    m.insert(
        "moves".to_string(),
        JsonValue::Array(c.moves.iter().map(|&mv| JsonValue::from(mv)).collect()),
    );
    m.insert("shiny".to_string(), JsonValue::from(c.shiny));
    m.insert("egg".to_string(), JsonValue::from(c.egg));
    m.insert(
        "generation".to_string(),
        match c.generation {
            Some(v) => JsonValue::from(v),
            None => JsonValue::Null,
        },
    );
    m.insert("legendary".to_string(), JsonValue::from(c.legendary));
    m.insert("mythical".to_string(), JsonValue::from(c.mythical));
    m.insert("starter".to_string(), JsonValue::from(c.starter));
    if let Some(form) = c.unown_form {
        m.insert("unown_form".to_string(), JsonValue::from(form));
    }
    m.insert(
        "checksum_valid".to_string(),
        JsonValue::from(c.checksum_valid),
    );
    JsonValue::Object(m)
}

fn slot_summary_to_json(s: &SlotSummary) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "state".to_string(),
        JsonValue::String(slot_state_name(s.state).to_string()),
    );
    m.insert("save_index".to_string(), JsonValue::from(s.save_index));
    if let Some(kind) = s.error_kind {
        m.insert(
            "error_kind".to_string(),
            JsonValue::String(format!("{kind:?}")),
        );
    }
    if let Some(error) = &s.error {
        m.insert("error".to_string(), JsonValue::String(error.clone()));
    }
    JsonValue::Object(m)
}

fn slot_state_name(state: SlotState) -> &'static str {
    match state {
        SlotState::Unwritten => "unwritten",
        SlotState::Valid => "valid",
        SlotState::Invalid => "invalid",
    }
}

fn render_sheet_impl(session: &Session, options: TextRenderOptions) -> String {
    let snapshot = session.snapshot();

    let title = match session.game() {
        GameVersion::RubySapphire => "RUBY / SAPPHIRE",
        GameVersion::LeafGreenFireRed => "FIRE RED / LEAF GREEN",
        GameVersion::Emerald => "EMERALD",
    };
    let subtitle = format!(
        "slot {}  save #{}  {}",
        snapshot.active_slot,
        snapshot.save_index,
        format_play_time(&snapshot.play_time)
    );

    let mut out = String::new();
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(&mut out, "{}", centered_no_trailing(title, SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(&mut out, "{}", centered_no_trailing("TRAINER CARD", SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(&mut out, "{}", centered_no_trailing(&subtitle, SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let name_section = format!("  Name: {:<19}", decode_text(&snapshot.trainer_name_raw));
    let id_section = format!("IDNo. {:05}{:<11}", snapshot.public_id, "");
    writeln!(
        &mut out,
        "{}{}Gender: {}",
        name_section, id_section, snapshot.gender
    )
    .expect("writing to String cannot fail");
    let dex_section = format!(
        "  Pokedex: {} owned / {} seen",
        snapshot.pokedex_owned, snapshot.pokedex_seen
    );
    writeln!(
        &mut out,
        "{:<44}Current box: {}",
        dex_section,
        snapshot.current_box + 1
    )
    .expect("writing to String cannot fail");
    if let Some(flags) = session.game_state_flags() {
        writeln!(
            &mut out,
            "  Mystery event: {}  Mystery gift: {}  Eon ticket: {}",
            yes_no(flags.mystery_event),
            yes_no(flags.mystery_gift),
            yes_no(flags.eon_ticket)
        )
        .expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, " ::: Party :::").expect("writing to String cannot fail");
    if session.party().is_empty() {
        writeln!(&mut out, "  (empty)").expect("writing to String cannot fail");
    }
    for entry in session.party() {
        write_creature_line(&mut out, entry, options);
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, " ::: Boxes ({}) :::", session.boxed().len())
        .expect("writing to String cannot fail");
    for entry in session.boxed() {
        write_creature_line(&mut out, entry, options);
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, " ::: Validation :::").expect("writing to String cannot fail");
    let validation = session.validation();
    for summary in [&validation.a, &validation.b] {
        let mut line = format!(
            "  slot {}: {} (save #{})",
            summary.slot,
            slot_state_name(summary.state),
            summary.save_index
        );
        if let Some(error) = &summary.error {
            line.push_str(": ");
            line.push_str(error);
        }
        writeln!(&mut out, "{}", line).expect("writing to String cannot fail");
    }

    out
}

fn write_creature_line(out: &mut String, entry: &CreatureEntry, options: TextRenderOptions) {
    let place = match entry.location {
        CreatureLocation::Party { index } => format!("{:>2}.", index + 1),
        CreatureLocation::Box { pc_box, slot } => format!("{:>2}/{:<2}", pc_box + 1, slot + 1),
    };
    let level = match entry.level {
        Some(level) => format!("Lv {:>3}", level),
        None => "Lv   -".to_string(),
    };
    let mut tags = Vec::new();
    if entry.egg {
        tags.push("egg");
    }
    if entry.shiny {
        tags.push("shiny");
    }
    if entry.legendary {
        tags.push("legendary");
    }
    if entry.mythical {
        tags.push("mythical");
    }
    if !entry.checksum_valid {
        tags.push("BAD CHECKSUM");
    }

    write!(
        out,
        "  {} {:<width$} #{:03}  {}  Exp {:<9}",
        place,
        fit_column(&decode_text(&entry.nickname_raw), NICKNAME_COL_WIDTH),
        entry.national_id,
        level,
        format_number_with_commas(entry.experience),
        width = NICKNAME_COL_WIDTH
    )
    .expect("writing to String cannot fail");
    if !tags.is_empty() {
        write!(out, " [{}]", tags.join(", ")).expect("writing to String cannot fail");
    }
    if options.verbose {
        write!(
            out,
            " pid={:#010x} moves={:?}",
            entry.personality, entry.moves
        )
        .expect("writing to String cannot fail");
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out: String = value.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

fn centered_no_trailing(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), value)
}

fn format_play_time(t: &PlayTime) -> String {
    format!("{}:{:02}:{:02}", t.hours, t.minutes, t.seconds)
}

fn format_number_with_commas(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
