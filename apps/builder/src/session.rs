//! Interactive editing session.
//!
//! One command per input line. Each command maps onto a single form operation on
//! the session's `FormStore`, or onto preview/export. Command errors are printed
//! and the session continues; only `quit` or end of input ends it.
//!
//! ```text
//! set personal fullName Jane Doe
//! add experience
//! set experience 3f2a current true
//! set experience 3f2a description - Shipped v2\n- Led team
//! export
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::export;
use crate::models::{AccentColor, FontFamily, ResumeDocument, COLOR_PRESETS};
use crate::preview::render_preview;
use crate::state::SessionState;
use crate::store::completeness::compute_completeness_report;
use crate::store::entries::normalize;
use crate::store::photo::try_encode_photo_file;
use crate::store::{FieldValue, FieldWrite, FormStore, Section};

const HELP: &str = "\
commands:
  add <section>                          add an empty entry, prints its id
  remove <section> <id>                  remove an entry
  set personal <field> <value>           e.g. set personal fullName Jane Doe
  set summary <text>
  set <section> <id> <field> <value>     ids may be abbreviated to a unique prefix
  list [section]                         entry ids
  photo <path> | photo clear
  accent <preset|#rrggbb>
  font <times|helvetica|courier>
  presets                                accent color presets
  status                                 missing required fields and entry counts
  preview                                plain-text preview
  export [dir]                           write the PDF
  load <file.json>                       replace the document with a JSON file
  json                                   print the document as JSON
  help
  quit
values: \\n inserts a line break";

// ────────────────────────────────────────────────────────────────────────────
// Command parsing
// ────────────────────────────────────────────────────────────────────────────

/// A parsed session command. Entry ids are kept as typed and resolved against
/// the store when the command runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Section),
    Remove { section: Section, id: String },
    Set { section: Section, id: Option<String>, field: String, value: String },
    List(Option<Section>),
    Photo(Option<PathBuf>),
    Accent(String),
    Font(FontFamily),
    Presets,
    Status,
    Preview,
    Export(Option<PathBuf>),
    Load(PathBuf),
    Json,
    Help,
    Quit,
}

/// Splits off the first whitespace-delimited token.
fn next_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(i) => (&input[..i], input[i..].trim_start()),
        None => (input, ""),
    }
}

fn require<'a>(token: &'a str, what: &str) -> Result<&'a str, AppError> {
    if token.is_empty() {
        Err(AppError::InvalidCommand(format!("missing {what}")))
    } else {
        Ok(token)
    }
}

/// Turns the two-character escape `\n` into a line break.
fn unescape(value: &str) -> String {
    value.replace("\\n", "\n")
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = next_token(line);
        match verb.to_ascii_lowercase().as_str() {
            "add" => {
                let section: Section = require(rest.trim(), "section")?.parse()?;
                if !section.is_list() {
                    return Err(AppError::InvalidCommand(format!("{section} has no entries to add")));
                }
                Ok(Command::Add(section))
            }
            "remove" | "rm" => {
                let (section, rest) = next_token(rest);
                let (id, _) = next_token(rest);
                Ok(Command::Remove {
                    section: require(section, "section")?.parse()?,
                    id: require(id, "entry id")?.to_string(),
                })
            }
            "set" => parse_set(rest),
            "list" | "ls" => match rest.trim() {
                "" => Ok(Command::List(None)),
                section => Ok(Command::List(Some(section.parse()?))),
            },
            "photo" => match rest.trim() {
                "clear" | "none" => Ok(Command::Photo(None)),
                path => Ok(Command::Photo(Some(PathBuf::from(require(path, "photo path")?)))),
            },
            "accent" | "color" => Ok(Command::Accent(require(rest.trim(), "color")?.to_string())),
            "font" => Ok(Command::Font(require(rest.trim(), "font family")?.parse()?)),
            "presets" => Ok(Command::Presets),
            "status" => Ok(Command::Status),
            "preview" => Ok(Command::Preview),
            "export" => match rest.trim() {
                "" => Ok(Command::Export(None)),
                dir => Ok(Command::Export(Some(PathBuf::from(dir)))),
            },
            "load" => Ok(Command::Load(PathBuf::from(require(rest.trim(), "file path")?))),
            "json" => Ok(Command::Json),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err(AppError::InvalidCommand("empty command".into())),
            other => Err(AppError::InvalidCommand(format!("unknown command '{other}'"))),
        }
    }
}

fn parse_set(rest: &str) -> Result<Command, AppError> {
    let (section, rest) = next_token(rest);
    let section: Section = require(section, "section")?.parse()?;
    match section {
        Section::Summary => Ok(Command::Set {
            section,
            id: None,
            field: "summary".into(),
            value: unescape(rest.trim_end()),
        }),
        Section::Personal => {
            let (field, value) = next_token(rest);
            Ok(Command::Set {
                section,
                id: None,
                field: require(field, "field name")?.to_string(),
                value: unescape(value.trim_end()),
            })
        }
        _ => {
            let (id, rest) = next_token(rest);
            let (field, value) = next_token(rest);
            Ok(Command::Set {
                section,
                id: Some(require(id, "entry id")?.to_string()),
                field: require(field, "field name")?.to_string(),
                value: unescape(value.trim_end()),
            })
        }
    }
}

/// Checkbox fields take `true`/`false` (also `yes`/`no`, `on`/`off`, `1`/`0`);
/// everything else is text.
fn field_value(field: &str, value: String) -> FieldValue {
    if normalize(field) != "current" {
        return FieldValue::Text(value);
    }
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => FieldValue::Flag(true),
        "false" | "no" | "off" | "0" => FieldValue::Flag(false),
        _ => FieldValue::Text(value),
    }
}

/// Resolves a full id or a unique prefix of one.
fn resolve_id(store: &FormStore, section: Section, typed: &str) -> Result<Uuid, AppError> {
    if let Ok(id) = Uuid::parse_str(typed) {
        return Ok(id);
    }
    let typed = typed.to_ascii_lowercase();
    let matches: Vec<Uuid> = store
        .entry_ids(section)
        .into_iter()
        .filter(|id| id.to_string().starts_with(&typed))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(AppError::InvalidCommand(format!("no {section} entry with id '{typed}'"))),
        _ => Err(AppError::InvalidCommand(format!("id prefix '{typed}' is ambiguous"))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Execution
// ────────────────────────────────────────────────────────────────────────────

pub enum Reply {
    Continue(String),
    Quit,
}

pub fn execute(state: &mut SessionState, command: Command) -> Result<Reply, AppError> {
    debug!(?command, "Session command");
    let message = match command {
        Command::Add(section) => match state.store.add_entry(section) {
            Some(id) => format!("added {section} {id}"),
            None => format!("{section} has no entries"),
        },

        Command::Remove { section, id } => {
            let id = resolve_id(&state.store, section, &id)?;
            if state.store.remove_entry(section, id) {
                format!("removed {section} {id}")
            } else {
                format!("no {section} entry {id}")
            }
        }

        Command::Set { section, id, field, value } => {
            let id = match id {
                Some(typed) => Some(resolve_id(&state.store, section, &typed)?),
                None => None,
            };
            match state.store.update_field(section, id, &field, field_value(&field, value)) {
                FieldWrite::Applied => "ok".to_string(),
                FieldWrite::Locked => format!("{field} is locked while this is the current position"),
                FieldWrite::UnknownField => format!("unknown field '{field}' for {section}"),
            }
        }

        Command::List(filter) => {
            let sections: Vec<Section> = match filter {
                Some(section) => vec![section],
                None => Section::LISTS.to_vec(),
            };
            let mut lines = Vec::new();
            for section in sections {
                for id in state.store.entry_ids(section) {
                    lines.push(format!("{section} {id}"));
                }
            }
            if lines.is_empty() {
                "no entries".to_string()
            } else {
                lines.join("\n")
            }
        }

        Command::Photo(Some(path)) => match try_encode_photo_file(&path) {
            Some(data_url) => {
                state
                    .store
                    .update_field(Section::Personal, None, "photo", FieldValue::Text(data_url));
                format!("photo set from {}", path.display())
            }
            None => "photo unchanged: file is not a readable image".to_string(),
        },
        Command::Photo(None) => {
            state
                .store
                .update_field(Section::Personal, None, "photo", FieldValue::text(""));
            "photo cleared".to_string()
        }

        Command::Accent(value) => {
            state.style.accent = AccentColor::from_preset_or_hex(&value);
            format!("accent {}", state.style.accent.0)
        }

        Command::Font(font) => {
            state.style.font = font;
            format!("font {font:?}")
        }

        Command::Presets => presets_listing(),

        Command::Status => {
            let report = compute_completeness_report(state.store.document());
            let mut lines = Vec::new();
            if report.is_complete() {
                lines.push("required fields: complete".to_string());
            } else {
                lines.push(format!("missing required: {}", report.missing_required.join(", ")));
            }
            for count in &report.sections {
                lines.push(format!("{}: {}", count.section, count.entry_count));
            }
            lines.join("\n")
        }

        Command::Preview => render_preview(state.store.document()).trim_end().to_string(),

        Command::Export(dir) => {
            let dir = dir.unwrap_or_else(|| state.output_dir.clone());
            let report = export(state.store.document(), &state.style, &dir)?;
            let mut message = format!(
                "exported {} ({} page{}, {} bytes)",
                report.path.display(),
                report.pages,
                if report.pages == 1 { "" } else { "s" },
                report.bytes
            );
            if !report.missing_required.is_empty() {
                message.push_str(&format!(
                    "\nwarning: missing {}",
                    report.missing_required.join(", ")
                ));
            }
            message
        }

        Command::Load(path) => {
            let document = load_document(&path)?;
            state.store = FormStore::from_document(document);
            format!("loaded {}", path.display())
        }

        Command::Json => serde_json::to_string_pretty(state.store.document())?,

        Command::Help => HELP.to_string(),

        Command::Quit => return Ok(Reply::Quit),
    };
    Ok(Reply::Continue(message))
}

/// Reads a JSON-encoded document.
pub fn load_document(path: &std::path::Path) -> Result<ResumeDocument, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let document = serde_json::from_str(&raw)?;
    Ok(document)
}

pub fn presets_listing() -> String {
    COLOR_PRESETS
        .iter()
        .map(|(name, hex)| format!("{name:<8} {hex}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs the read-eval-print loop until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    state: &mut SessionState,
    input: R,
    mut output: W,
) -> Result<(), AppError> {
    info!("Session started");
    writeln!(output, "Resume builder. Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let reply = line.parse::<Command>().and_then(|command| execute(state, command));
        match reply {
            Ok(Reply::Continue(message)) => writeln!(output, "{message}")?,
            Ok(Reply::Quit) => break,
            Err(e) => writeln!(output, "error [{}]: {e}", e.code())?,
        }
        output.flush()?;
    }

    info!("Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::photo::tests::tiny_png;

    fn state_in(dir: &std::path::Path) -> SessionState {
        SessionState::new(&Config {
            accent_color: "#2563eb".into(),
            font: FontFamily::Times,
            output_dir: dir.to_path_buf(),
            rust_log: "info".into(),
        })
    }

    fn run(state: &mut SessionState, script: &str) -> String {
        let mut out = Vec::new();
        run_session(state, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn only_id(state: &SessionState, section: Section) -> Uuid {
        let ids = state.store.entry_ids(section);
        assert_eq!(ids.len(), 1);
        ids[0]
    }

    #[test]
    fn test_parse_set_personal_keeps_spaces_in_value() {
        let command: Command = "set personal fullName Jane  Doe".parse().unwrap();
        assert_eq!(
            command,
            Command::Set {
                section: Section::Personal,
                id: None,
                field: "fullName".into(),
                value: "Jane  Doe".into(),
            }
        );
    }

    #[test]
    fn test_parse_unescapes_line_breaks() {
        let command: Command = r"set experience abc description - A\n- B".parse().unwrap();
        match command {
            Command::Set { id, value, .. } => {
                assert_eq!(id.as_deref(), Some("abc"));
                assert_eq!(value, "- A\n- B");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("frobnicate".parse::<Command>(), Err(AppError::InvalidCommand(_))));
        assert!(matches!("add".parse::<Command>(), Err(AppError::InvalidCommand(_))));
        assert!(matches!("add hobbies".parse::<Command>(), Err(AppError::UnknownSection(_))));
        assert!(matches!("font comic".parse::<Command>(), Err(AppError::UnknownFont(_))));
    }

    #[test]
    fn test_session_edits_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        run(&mut state, "set personal fullName Jane Doe\nadd experience\nquit\n");

        let id = only_id(&state, Section::Experience);
        let prefix = &id.to_string()[..8];
        let out = run(
            &mut state,
            &format!(
                "set experience {prefix} title Engineer\n\
                 set experience {prefix} current true\n\
                 set experience {prefix} endDate 2020-01\n"
            ),
        );
        assert!(out.contains("endDate is locked"));

        let exp = &state.store.document().experience[0];
        assert_eq!(state.store.document().personal_info.full_name, "Jane Doe");
        assert_eq!(exp.title, "Engineer");
        assert!(exp.current);
        assert_eq!(exp.end_date, "Present");
    }

    #[test]
    fn test_checkbox_values_become_flags() {
        assert_eq!(field_value("current", "true".into()), FieldValue::Flag(true));
        assert_eq!(field_value("current", " Off ".into()), FieldValue::Flag(false));
        assert_eq!(field_value("title", "true".into()), FieldValue::text("true"));
    }

    #[test]
    fn test_unknown_command_does_not_end_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let out = run(&mut state, "bogus\nset summary Still here\n");
        assert!(out.contains("error [INVALID_COMMAND]"));
        assert_eq!(state.store.document().summary, "Still here");
    }

    #[test]
    fn test_remove_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        run(&mut state, "add skills\nadd skills\n");
        let ids = state.store.entry_ids(Section::Skills);
        let out = run(&mut state, &format!("remove skills {}\n", ids[0]));
        assert!(out.contains("removed skills"));
        assert_eq!(state.store.entry_ids(Section::Skills), vec![ids[1]]);
    }

    #[test]
    fn test_export_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let out = run(&mut state, "set personal fullName Jane Doe\nexport\n");
        assert!(out.contains("1 page,"));
        assert!(out.contains("warning: missing email"));
        assert!(dir.path().join("Jane_Doe.pdf").exists());
    }

    #[test]
    fn test_accent_and_font() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let out = run(&mut state, "accent purple\nfont helvetica\naccent nonsense\n");
        assert!(out.contains("accent #7c3aed"));
        assert!(out.contains("accent #2563eb"));
        assert_eq!(state.style.font, FontFamily::Helvetica);
    }

    #[test]
    fn test_photo_upload_and_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("me.png");
        std::fs::write(&png, tiny_png()).unwrap();
        let junk = dir.path().join("junk.png");
        std::fs::write(&junk, b"not an image").unwrap();

        let mut state = state_in(dir.path());
        run(&mut state, &format!("photo {}\n", png.display()));
        let photo = state.store.document().personal_info.photo.clone().unwrap();
        assert!(photo.starts_with("data:image/png;base64,"));

        let out = run(&mut state, &format!("photo {}\n", junk.display()));
        assert!(out.contains("photo unchanged"));
        assert_eq!(state.store.document().personal_info.photo.as_deref(), Some(photo.as_str()));
    }

    #[test]
    fn test_load_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(
            &path,
            r#"{"personalInfo":{"fullName":"Jane Doe","email":"jane@example.com"},
                "skills":[{"category":"Languages","items":"Rust"}]}"#,
        )
        .unwrap();

        let mut state = state_in(dir.path());
        let out = run(&mut state, &format!("load {}\npreview\n", path.display()));
        assert!(out.contains("Jane Doe\njane@example.com"));
        assert!(out.contains("Languages: Rust"));
        assert_eq!(state.store.entry_ids(Section::Skills).len(), 1);
    }

    #[test]
    fn test_status_reports_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let out = run(&mut state, "status\n");
        assert!(out.contains("missing required: fullName, email"));
        assert!(out.contains("experience: 0"));
    }
}
