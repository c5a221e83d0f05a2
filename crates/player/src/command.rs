//! Terminal commands
//!
//! One line of input maps to one [`Command`]. Parsing is pure so the REPL
//! loop only has to dispatch.

use std::fmt;
use std::path::PathBuf;

use theatre_domain::{parse_mentions, SceneMode};
use thiserror::Error;

use crate::application::editors::{CharacterField, SceneCharacterField, SceneField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPanel {
    Allmemory,
    Dramallm,
    Allscript,
}

impl InfoPanel {
    pub const ALL: [InfoPanel; 3] = [Self::Allmemory, Self::Dramallm, Self::Allscript];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allmemory => "allmemory",
            Self::Dramallm => "dramallm",
            Self::Allscript => "allscript",
        }
    }
}

impl fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptField {
    Name,
    Player,
    Narrative,
}

/// One change to the open script draft. Indices are zero-based; the command
/// line counts from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    SetScript { field: ScriptField, value: String },
    AddCharacter,
    SetCharacter { index: usize, field: CharacterField, value: String },
    RemoveCharacter(usize),
    AddScene,
    SetScene { index: usize, field: SceneField },
    RemoveScene(usize),
    AddCast { scene: usize },
    SetCast { scene: usize, index: usize, field: SceneCharacterField },
    RemoveCast { scene: usize, index: usize },
    AddChain { scene: usize },
    SetChain { scene: usize, index: usize, entry: String },
    RemoveChain { scene: usize, index: usize },
    AddDetail { scene: usize, chain: usize },
    SetDetail { scene: usize, chain: usize, index: usize, text: String },
    RemoveDetail { scene: usize, chain: usize, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `say [@a,b] text`; `object` is the first addressee, if any.
    Say {
        message: String,
        object: Option<String>,
    },
    Stay,
    Next,
    Back,
    Withdraw,
    Scene,
    Chain,
    Characters,
    Info(InfoPanel),
    Role(String),
    New,
    Load(String),
    Save,
    Scripts,
    Export,
    Import(PathBuf),
    Upload {
        character: String,
        file: PathBuf,
    },
    /// Open a draft of the running script.
    Edit,
    /// Show the open draft.
    Draft,
    Amend(DraftEdit),
    Commit,
    Discard,
    Prompts,
    PromptSet {
        key: String,
        file: PathBuf,
    },
    Model,
    ModelSet {
        field: String,
        value: String,
    },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (type `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
say [@a,b] text   speak, optionally addressing characters
stay              let the scene play without speaking
next | back       move to the next or previous scene
withdraw          undo the last round
scene | chain     show the current scene or its plot chain
characters        list addressable characters
info <allmemory|dramallm|allscript>
role <name>       show a character's profile and memory
new               start a blank script and open it as a draft
load <name>       load hp, station, romeo or a saved script id
save              save the running session
scripts           list bundled and saved scripts
export            write the records to a dated JSON file
import <file>     import a script file into the backend
upload <name> <file>

edit              open a draft of the running script
draft             show the open draft
script name|player|narrative <text>
char add | char set <n> id|profile|memory <text> | char rm <n>
scene add | scene set <n> name|info|mode <text> | scene rm <n>
cast add <scene> | cast set <scene> <n> name|motivation <text> | cast rm <scene> <n>
chain add <scene> | chain set <scene> <n> <text> | chain rm <scene> <n>
detail add <scene> <chain> | detail set <scene> <chain> <n> <text> | detail rm <scene> <chain> <n>
commit | discard  save the draft to the backend, or drop it

prompts | model   show prompt templates or model settings
prompt set <key> <file>
model set provider|<provider>.<field> <value>
help | quit";

const SCRIPT_USAGE: &str = "script name|player|narrative <text>";
const CHAR_USAGE: &str = "char add | char set <n> id|profile|memory <text> | char rm <n>";
const SCENE_USAGE: &str = "scene add | scene set <n> name|info|mode <text> | scene rm <n>";
const MODE_USAGE: &str = "scene set <n> mode v1|v2|v2_plus|v2_prime|v3";
const CAST_USAGE: &str =
    "cast add <scene> | cast set <scene> <n> name|motivation <text> | cast rm <scene> <n>";
const CHAIN_USAGE: &str = "chain add <scene> | chain set <scene> <n> <text> | chain rm <scene> <n>";
const DETAIL_USAGE: &str = "detail add <scene> <chain> | detail set <scene> <chain> <n> <text> | detail rm <scene> <chain> <n>";
const PROMPT_USAGE: &str = "prompt set <key> <file>";
const MODEL_USAGE: &str = "model set provider|<provider>.<field> <value>";

/// First word and the trimmed remainder.
fn next_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

/// One-based position from the command line, as a zero-based index.
fn index(word: &str, usage: &'static str) -> Result<usize, CommandError> {
    word.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or(CommandError::Usage(usage))
}

/// Leading indices followed by free text.
fn indices<'a, const N: usize>(rest: &'a str, usage: &'static str) -> Result<([usize; N], &'a str), CommandError> {
    let mut out = [0; N];
    let mut rest = rest;
    for slot in out.iter_mut() {
        let (word, tail) = next_word(rest);
        *slot = index(word, usage)?;
        rest = tail;
    }
    Ok((out, rest))
}

fn parse_script(rest: &str) -> Result<DraftEdit, CommandError> {
    let (field, value) = next_word(rest);
    let field = match field {
        "name" => ScriptField::Name,
        "player" => ScriptField::Player,
        "narrative" => ScriptField::Narrative,
        _ => return Err(CommandError::Usage(SCRIPT_USAGE)),
    };
    Ok(DraftEdit::SetScript {
        field,
        value: value.to_string(),
    })
}

fn parse_char(rest: &str) -> Result<DraftEdit, CommandError> {
    let (action, rest) = next_word(rest);
    match action {
        "add" => Ok(DraftEdit::AddCharacter),
        "rm" => Ok(DraftEdit::RemoveCharacter(index(rest, CHAR_USAGE)?)),
        "set" => {
            let ([index], rest) = indices::<1>(rest, CHAR_USAGE)?;
            let (field, value) = next_word(rest);
            let field = match field {
                "id" => CharacterField::Id,
                "profile" => CharacterField::Profile,
                "memory" => CharacterField::InitialMemory,
                _ => return Err(CommandError::Usage(CHAR_USAGE)),
            };
            Ok(DraftEdit::SetCharacter {
                index,
                field,
                value: value.to_string(),
            })
        }
        _ => Err(CommandError::Usage(CHAR_USAGE)),
    }
}

fn parse_scene(rest: &str) -> Result<DraftEdit, CommandError> {
    let (action, rest) = next_word(rest);
    match action {
        "add" => Ok(DraftEdit::AddScene),
        "rm" => Ok(DraftEdit::RemoveScene(index(rest, SCENE_USAGE)?)),
        "set" => {
            let ([index], rest) = indices::<1>(rest, SCENE_USAGE)?;
            let (field, value) = next_word(rest);
            let field = match field {
                "name" => SceneField::Name(value.to_string()),
                "info" => SceneField::Info(value.to_string()),
                "mode" => SceneField::Mode(
                    value
                        .parse::<SceneMode>()
                        .map_err(|_| CommandError::Usage(MODE_USAGE))?,
                ),
                _ => return Err(CommandError::Usage(SCENE_USAGE)),
            };
            Ok(DraftEdit::SetScene { index, field })
        }
        _ => Err(CommandError::Usage(SCENE_USAGE)),
    }
}

fn parse_cast(rest: &str) -> Result<DraftEdit, CommandError> {
    let (action, rest) = next_word(rest);
    match action {
        "add" => Ok(DraftEdit::AddCast {
            scene: index(rest, CAST_USAGE)?,
        }),
        "rm" => {
            let ([scene, index], _) = indices::<2>(rest, CAST_USAGE)?;
            Ok(DraftEdit::RemoveCast { scene, index })
        }
        "set" => {
            let ([scene, index], rest) = indices::<2>(rest, CAST_USAGE)?;
            let (field, value) = next_word(rest);
            let field = match field {
                "name" => SceneCharacterField::Name(value.to_string()),
                "motivation" => SceneCharacterField::Motivation(value.to_string()),
                _ => return Err(CommandError::Usage(CAST_USAGE)),
            };
            Ok(DraftEdit::SetCast { scene, index, field })
        }
        _ => Err(CommandError::Usage(CAST_USAGE)),
    }
}

fn parse_chain(rest: &str) -> Result<DraftEdit, CommandError> {
    let (action, rest) = next_word(rest);
    match action {
        "add" => Ok(DraftEdit::AddChain {
            scene: index(rest, CHAIN_USAGE)?,
        }),
        "rm" => {
            let ([scene, index], _) = indices::<2>(rest, CHAIN_USAGE)?;
            Ok(DraftEdit::RemoveChain { scene, index })
        }
        "set" => {
            let ([scene, index], entry) = indices::<2>(rest, CHAIN_USAGE)?;
            Ok(DraftEdit::SetChain {
                scene,
                index,
                entry: entry.to_string(),
            })
        }
        _ => Err(CommandError::Usage(CHAIN_USAGE)),
    }
}

fn parse_detail(rest: &str) -> Result<DraftEdit, CommandError> {
    let (action, rest) = next_word(rest);
    match action {
        "add" => {
            let ([scene, chain], _) = indices::<2>(rest, DETAIL_USAGE)?;
            Ok(DraftEdit::AddDetail { scene, chain })
        }
        "rm" => {
            let ([scene, chain, index], _) = indices::<3>(rest, DETAIL_USAGE)?;
            Ok(DraftEdit::RemoveDetail { scene, chain, index })
        }
        "set" => {
            let ([scene, chain, index], text) = indices::<3>(rest, DETAIL_USAGE)?;
            Ok(DraftEdit::SetDetail {
                scene,
                chain,
                index,
                text: text.to_string(),
            })
        }
        _ => Err(CommandError::Usage(DETAIL_USAGE)),
    }
}

/// `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = next_word(line);

    let command = match verb.to_ascii_lowercase().as_str() {
        "say" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("say [@a,b] text"));
            }
            let object = parse_mentions(rest).first_role().map(str::to_string);
            Command::Say {
                message: rest.to_string(),
                object,
            }
        }
        "stay" => Command::Stay,
        "next" => Command::Next,
        "back" => Command::Back,
        "withdraw" => Command::Withdraw,
        "scene" if rest.is_empty() => Command::Scene,
        "scene" => Command::Amend(parse_scene(rest)?),
        "chain" if rest.is_empty() => Command::Chain,
        "chain" => Command::Amend(parse_chain(rest)?),
        "characters" => Command::Characters,
        "info" => {
            let panel = InfoPanel::ALL
                .into_iter()
                .find(|panel| panel.as_str().eq_ignore_ascii_case(rest))
                .ok_or(CommandError::Usage("info <allmemory|dramallm|allscript>"))?;
            Command::Info(panel)
        }
        "role" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("role <name>"));
            }
            Command::Role(rest.to_string())
        }
        "new" => Command::New,
        "load" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("load <name|hp|station|romeo>"));
            }
            Command::Load(rest.to_string())
        }
        "save" => Command::Save,
        "scripts" => Command::Scripts,
        "export" => Command::Export,
        "import" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("import <file>"));
            }
            Command::Import(PathBuf::from(rest))
        }
        "edit" => Command::Edit,
        "draft" => Command::Draft,
        "script" => Command::Amend(parse_script(rest)?),
        "char" => Command::Amend(parse_char(rest)?),
        "cast" => Command::Amend(parse_cast(rest)?),
        "detail" => Command::Amend(parse_detail(rest)?),
        "commit" => Command::Commit,
        "discard" => Command::Discard,
        "upload" => {
            let (character, file) = rest
                .split_once(char::is_whitespace)
                .map(|(c, f)| (c.trim(), f.trim()))
                .filter(|(c, f)| !c.is_empty() && !f.is_empty())
                .ok_or(CommandError::Usage("upload <name> <file>"))?;
            Command::Upload {
                character: character.to_string(),
                file: PathBuf::from(file),
            }
        }
        "prompts" => Command::Prompts,
        "prompt" => {
            let (action, rest) = next_word(rest);
            let (key, file) = next_word(rest);
            if action != "set" || key.is_empty() || file.is_empty() {
                return Err(CommandError::Usage(PROMPT_USAGE));
            }
            Command::PromptSet {
                key: key.to_string(),
                file: PathBuf::from(file),
            }
        }
        "model" if rest.is_empty() => Command::Model,
        "model" => {
            let (action, rest) = next_word(rest);
            let (field, value) = next_word(rest);
            if action != "set" || field.is_empty() || value.is_empty() {
                return Err(CommandError::Usage(MODEL_USAGE));
            }
            Command::ModelSet {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
