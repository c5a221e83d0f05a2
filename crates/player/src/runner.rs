//! Line-oriented front end over [`TheatreClient`].
//!
//! Reads commands from any async reader and writes plain text to any async
//! writer, so the loop runs the same against stdin/stdout and in tests.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use theatre_domain::DomainError;
use theatre_shared::{ActionKind, ExampleScript};

use crate::application::editors::ScriptDraft;
use crate::application::TheatreClient;
use crate::command::{parse_command, Command, DraftEdit, InfoPanel, ScriptField, HELP};
use crate::presentation::{
    render_character_info, render_message, render_system_feedback, render_world_records,
    SceneView, ScriptOverview,
};

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    client: TheatreClient,
    /// Transcript lines already printed
    seen: usize,
    /// Script being edited; nothing reaches the backend until `commit`.
    draft: Option<ScriptDraft>,
}

impl Repl {
    pub fn new(client: TheatreClient) -> Self {
        Self {
            client,
            seen: 0,
            draft: None,
        }
    }

    pub fn client(&self) -> &TheatreClient {
        &self.client
    }

    pub fn draft(&self) -> Option<&ScriptDraft> {
        self.draft.as_ref()
    }

    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut pending = self.drain().await;
        loop {
            for line in pending.drain(..) {
                output.write_all(line.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let (flow, mut out) = match parse_command(&line) {
                Ok(Some(command)) => self.execute(command).await,
                Ok(None) => (Flow::Continue, Vec::new()),
                Err(e) => (Flow::Continue, vec![e.to_string()]),
            };
            out.extend(self.drain().await);
            pending = out;
            if flow == Flow::Quit {
                break;
            }
        }
        for line in pending {
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
        }
        output.flush().await?;
        Ok(())
    }

    /// The latest notice plus transcript lines not printed yet.
    async fn drain(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(notice) = self.client.take_notice().await {
            out.push(notice.to_string());
        }
        let transcript = self.client.transcript().await;
        // Withdraw and script changes shrink the transcript.
        self.seen = self.seen.min(transcript.len());
        out.extend(transcript.since(self.seen).iter().map(render_message));
        self.seen = transcript.len();
        out
    }

    /// Run one command. Failures are already posted as notices by the client.
    pub async fn execute(&mut self, command: Command) -> (Flow, Vec<String>) {
        let client = &self.client;
        let mut out = Vec::new();
        match command {
            Command::Say { message, object } => {
                let _ = client.send_action(ActionKind::Speak, &message, object).await;
            }
            Command::Stay => {
                let _ = client.send_action(ActionKind::Stay, "", None).await;
            }
            Command::Next => {
                if client.next_scene().await.is_ok() {
                    out.extend(self.scene_lines().await);
                }
            }
            Command::Back => {
                if client.back_scene().await.is_ok() {
                    out.extend(self.scene_lines().await);
                }
            }
            Command::Withdraw => {
                let _ = client.withdraw().await;
            }
            Command::Scene => out.extend(self.scene_lines().await),
            Command::Chain => match client.state().await {
                Some(state) => {
                    let view = SceneView::from_state(&state);
                    out.push(format!("{} / {} completed", view.completed(), view.chain.len()));
                    out.extend(view.chain.iter().map(|entry| {
                        let mark = if entry.completed { "x" } else { " " };
                        format!("[{mark}] {}", entry.entry)
                    }));
                }
                None => out.push("No game loaded".to_string()),
            },
            Command::Characters => {
                if let Ok(names) = client.characters().await {
                    out.push(if names.is_empty() {
                        "(no characters)".to_string()
                    } else {
                        names.join(", ")
                    });
                }
            }
            Command::Info(panel) => out.extend(self.panel_lines(panel).await),
            Command::Role(name) => {
                if let Ok(info) = client.character_info(&name).await {
                    out.extend(render_character_info(&name, &info));
                }
            }
            Command::New => {
                let state = client.new_script().await;
                self.draft = Some(ScriptDraft::from_state(&state));
                out.extend(self.scene_lines().await);
            }
            Command::Load(name) => {
                if client.load_script(&name).await.is_ok() {
                    out.extend(self.scene_lines().await);
                }
            }
            Command::Save => {
                let _ = client.save_session().await;
            }
            Command::Scripts => {
                out.extend(
                    ExampleScript::ALL
                        .iter()
                        .map(|example| format!("{:<8} {}", example.as_str(), example.title())),
                );
                if let Ok(scripts) = client.saved_scripts().await {
                    if scripts.is_empty() {
                        out.push("(no saved scripts)".to_string());
                    }
                    out.extend(
                        scripts
                            .iter()
                            .map(|s| format!("{}  {}  {}", s.id, s.name, s.timestamp)),
                    );
                }
            }
            Command::Export => {
                let _ = client.export_records().await;
            }
            Command::Import(file) => {
                let _ = client.import_script_file(&file).await;
            }
            Command::Upload { character, file } => {
                let _ = client.upload_avatar(&character, &file).await;
            }
            Command::Prompts => {
                if let Ok(prompts) = client.prompts().await {
                    out.extend(prompts.keys().map(|key| {
                        let first = prompts
                            .get(key)
                            .and_then(|t| t.lines().next())
                            .unwrap_or_default();
                        format!("{key}: {first}")
                    }));
                }
            }
            Command::PromptSet { key, file } => {
                let _ = client.set_prompt_from_file(&key, &file).await;
            }
            Command::ModelSet { field, value } => {
                let _ = client.set_model_field(&field, &value).await;
            }
            Command::Edit => {
                let draft = match client.state().await {
                    Some(state) => ScriptDraft::from_state(&state),
                    None => ScriptDraft::new(),
                };
                out.extend(draft_lines(&draft));
                self.draft = Some(draft);
            }
            Command::Draft => match &self.draft {
                Some(draft) => out.extend(draft_lines(draft)),
                None => out.push(NO_DRAFT.to_string()),
            },
            Command::Amend(edit) => match self.draft.as_mut() {
                Some(draft) => out.push(match apply_edit(draft, edit) {
                    Ok(done) => done,
                    Err(e) => e.to_string(),
                }),
                None => out.push(NO_DRAFT.to_string()),
            },
            Command::Commit => {
                let saved = match &self.draft {
                    Some(draft) => client.save_draft(draft).await.is_ok(),
                    None => {
                        out.push(NO_DRAFT.to_string());
                        false
                    }
                };
                if saved {
                    self.draft = None;
                    out.extend(self.scene_lines().await);
                }
            }
            Command::Discard => {
                out.push(match self.draft.take() {
                    Some(_) => "Draft discarded".to_string(),
                    None => NO_DRAFT.to_string(),
                });
            }
            Command::Model => {
                if let Ok(config) = client.model_config().await {
                    match serde_json::to_string_pretty(&config.redacted()) {
                        Ok(text) => out.extend(text.lines().map(str::to_string)),
                        Err(e) => tracing::warn!(error = %e, "Failed to render model config"),
                    }
                }
            }
            Command::Help => out.extend(HELP.lines().map(str::to_string)),
            Command::Quit => return (Flow::Quit, out),
        }
        (Flow::Continue, out)
    }

    async fn scene_lines(&self) -> Vec<String> {
        match self.client.state().await {
            Some(state) => SceneView::from_state(&state)
                .to_string()
                .lines()
                .map(str::to_string)
                .collect(),
            None => vec!["No game loaded".to_string()],
        }
    }

    async fn panel_lines(&self, panel: InfoPanel) -> Vec<String> {
        let client = &self.client;
        match panel {
            InfoPanel::Allmemory => client
                .world_records()
                .await
                .map(|records| render_world_records(&records))
                .unwrap_or_default(),
            InfoPanel::Dramallm => client
                .system_feedbacks()
                .await
                .map(|feedback| render_system_feedback(&feedback))
                .unwrap_or_default(),
            InfoPanel::Allscript => match client.script_info().await {
                Ok(info) => match ScriptOverview::from_script_info(&info) {
                    Some(overview) => overview.to_string().lines().map(str::to_string).collect(),
                    None => vec![info.allscript.to_string()],
                },
                Err(_) => Vec::new(),
            },
        }
    }
}

const NO_DRAFT: &str = "No draft open (type `edit` or `new`)";

/// Apply one edit and describe what changed.
fn apply_edit(draft: &mut ScriptDraft, edit: DraftEdit) -> Result<String, DomainError> {
    let done = match edit {
        DraftEdit::SetScript { field, value } => {
            match field {
                ScriptField::Name => draft.script_name = value,
                ScriptField::Player => draft.player_name = value,
                ScriptField::Narrative => draft.background_narrative = value,
            }
            "Script updated".to_string()
        }
        DraftEdit::AddCharacter => format!("Added character {}", draft.add_character() + 1),
        DraftEdit::SetCharacter { index, field, value } => {
            draft.update_character(index, field, value)?;
            format!("Character {} updated", index + 1)
        }
        DraftEdit::RemoveCharacter(index) => {
            let removed = draft.remove_character(index)?;
            format!("Removed character {}", removed.id)
        }
        DraftEdit::AddScene => format!("Added scene {}", draft.add_scene() + 1),
        DraftEdit::SetScene { index, field } => {
            draft.update_scene(index, field)?;
            format!("Scene {} updated", index + 1)
        }
        DraftEdit::RemoveScene(index) => {
            draft.remove_scene(index)?;
            format!("Removed scene {}", index + 1)
        }
        DraftEdit::AddCast { scene } => match draft.add_scene_character(scene)? {
            Some(name) => format!("{name} joins scene {}", scene + 1),
            None => "Every character is already in the scene".to_string(),
        },
        DraftEdit::SetCast { scene, index, field } => {
            draft.update_scene_character(scene, index, field)?;
            format!("Scene {} cast updated", scene + 1)
        }
        DraftEdit::RemoveCast { scene, index } => {
            let removed = draft.remove_scene_character(scene, index)?;
            format!("{} leaves scene {}", removed.name, scene + 1)
        }
        DraftEdit::AddChain { scene } => {
            format!("Added chain entry {}", draft.add_chain(scene)? + 1)
        }
        DraftEdit::SetChain { scene, index, entry } => {
            draft.update_chain(scene, index, entry)?;
            format!("Chain entry {} updated", index + 1)
        }
        DraftEdit::RemoveChain { scene, index } => {
            draft.remove_chain(scene, index)?;
            format!("Removed chain entry {}", index + 1)
        }
        DraftEdit::AddDetail { scene, chain } => {
            format!("Added detail {}", draft.add_stream_detail(scene, chain)? + 1)
        }
        DraftEdit::SetDetail {
            scene,
            chain,
            index,
            text,
        } => {
            draft.update_stream_detail(scene, chain, index, text)?;
            format!("Detail {} updated", index + 1)
        }
        DraftEdit::RemoveDetail { scene, chain, index } => {
            draft.remove_stream_detail(scene, chain, index)?;
            format!("Removed detail {}", index + 1)
        }
    };
    Ok(done)
}

fn draft_lines(draft: &ScriptDraft) -> Vec<String> {
    let mut out = vec![format!(
        "Draft \"{}\"  player: {}",
        draft.script_name, draft.player_name
    )];
    if !draft.background_narrative.is_empty() {
        out.push(format!("  {}", draft.background_narrative));
    }
    for (i, character) in draft.characters.iter().enumerate() {
        out.push(format!("char {}. {}  {}", i + 1, character.id, character.profile));
    }
    for (i, scene) in draft.scenes.iter().enumerate() {
        out.push(format!("scene {}. {} [{}]", i + 1, scene.name, scene.mode));
        for (j, cast) in scene.characters.iter().enumerate() {
            out.push(format!("  cast {}. {}: {}", j + 1, cast.name, cast.motivation));
        }
        for (j, chain) in scene.chains.iter().enumerate() {
            out.push(format!("  chain {}. {}", j + 1, chain.entry));
            for (k, detail) in chain.details.iter().enumerate() {
                out.push(format!("    detail {}. {}", k + 1, detail));
            }
        }
    }
    out
}
