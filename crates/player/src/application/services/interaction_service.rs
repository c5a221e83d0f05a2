//! Interaction Service - Player actions and scene navigation
//!
//! Sends `/api/interact` requests and folds the replies into the transcript
//! and the game store. Only one action may be in flight at a time; responses
//! that arrive after a newer request was issued are discarded by the store.

use std::sync::Arc;

use theatre_domain::{parse_mentions, GameState, Message};
use theatre_shared::{ActionEntry, ActionKind, InteractRequest, InteractResponse, Navigation};
use tokio::sync::Mutex;

use crate::application::api::TheatreApi;
use crate::application::{ParseResponse, ServiceError};
use crate::ports::outbound::{ApiError, ClockPort};
use crate::state::{ApplyOutcome, GameStore, InteractionPhase, Transcript};

/// What a completed `send_action` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Blank speak: nothing was sent.
    Skipped,
    Completed {
        appended: usize,
        state_replaced: bool,
    },
}

#[derive(Clone)]
pub struct InteractionService {
    api: TheatreApi,
    store: GameStore,
    clock: Arc<dyn ClockPort>,
    transcript: Arc<Mutex<Transcript>>,
    phase: Arc<Mutex<InteractionPhase>>,
    player_fallback: String,
}

impl InteractionService {
    pub fn new(
        api: TheatreApi,
        store: GameStore,
        clock: Arc<dyn ClockPort>,
        player_fallback: impl Into<String>,
    ) -> Self {
        Self {
            api,
            store,
            clock,
            transcript: Arc::new(Mutex::new(Transcript::new())),
            phase: Arc::new(Mutex::new(InteractionPhase::Idle)),
            player_fallback: player_fallback.into(),
        }
    }

    pub async fn phase(&self) -> InteractionPhase {
        *self.phase.lock().await
    }

    pub async fn transcript(&self) -> Transcript {
        self.transcript.lock().await.clone()
    }

    pub async fn clear_transcript(&self) {
        self.transcript.lock().await.clear();
    }

    /// Send a player action. A blank `-speak` is skipped without a request.
    pub async fn send_action(
        &self,
        kind: ActionKind,
        message: &str,
        object: Option<String>,
    ) -> Result<InteractionOutcome, ServiceError> {
        if kind.is_speak() && message.trim().is_empty() {
            return Ok(InteractionOutcome::Skipped);
        }

        {
            let mut phase = self.phase.lock().await;
            if phase.is_sending() {
                return Err(ServiceError::Busy);
            }
            *phase = InteractionPhase::Sending;
        }

        let request = match &kind {
            ActionKind::Speak => InteractRequest::speak(message, object),
            ActionKind::Stay => InteractRequest::stay(),
            other => InteractRequest::Act {
                kind: other.clone(),
                message: Some(message.to_string()),
                object,
            },
        };

        let ticket = self.store.begin_request();
        tracing::info!(action = %kind, ticket = ticket.sequence(), "Sending action");
        let result = self.api.calculate_interaction(&request).await.parse();

        let outcome = match result {
            Ok(response) => Ok(self.absorb(response, message, ticket).await),
            Err(ServiceError::Api(ApiError::Application(reason))) => {
                Err(ServiceError::Rejected(reason))
            }
            Err(e) => Err(e),
        };

        *self.phase.lock().await = match &outcome {
            Ok(_) => InteractionPhase::Appended,
            Err(_) => InteractionPhase::ErroredDisplayed,
        };
        outcome
    }

    async fn absorb(
        &self,
        response: InteractResponse,
        sent: &str,
        ticket: crate::state::RequestTicket,
    ) -> InteractionOutcome {
        let now = self.clock.now();
        let current = self.store.snapshot().await;
        let author = current
            .as_ref()
            .map(GameState::player_name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(self.player_fallback.as_str())
            .to_string();

        let mut messages = Vec::new();
        if let Some(input) = response.input.as_ref().filter(|i| i.x.is_speak()) {
            messages.push(player_message(&author, input, sent, now));
        }
        for entry in response.action.iter().filter(|a| a.x.is_speak()) {
            let Some(aid) = entry.aid.as_deref() else {
                tracing::debug!("Skipping speak action without an actor");
                continue;
            };
            let content = entry.content.as_deref().unwrap_or_default();
            messages.push(Message::speak(aid, content, entry.bid.as_slice().to_vec(), now));
        }

        let appended = messages.len();
        self.transcript.lock().await.extend(messages);

        let mut state_replaced = false;
        if response.done {
            if let Some(state) = response.state {
                state_replaced = self.install(ticket, state).await.is_applied();
            }
        }

        tracing::debug!(appended, done = response.done, state_replaced, "Action absorbed");
        InteractionOutcome::Completed {
            appended,
            state_replaced,
        }
    }

    async fn install(&self, ticket: crate::state::RequestTicket, state: GameState) -> ApplyOutcome {
        let outcome = self.store.apply(ticket, state).await;
        if outcome.script_changed() {
            self.clear_transcript().await;
        }
        outcome
    }

    async fn navigate(&self, navigation: Navigation) -> Result<ApplyOutcome, ServiceError> {
        let ticket = self.store.begin_request();
        tracing::info!(navigation = navigation.as_str(), ticket = ticket.sequence(), "Navigating");
        let (state, _) = self.api.navigate(navigation).await.parse()?.into_parts();
        match state {
            Some(state) => Ok(self.install(ticket, state).await),
            None => Err(ServiceError::Api(ApiError::ParseError(
                "navigation response carried no state".to_string(),
            ))),
        }
    }

    pub async fn next_scene(&self) -> Result<ApplyOutcome, ServiceError> {
        self.navigate(Navigation::Next).await
    }

    pub async fn back_scene(&self) -> Result<ApplyOutcome, ServiceError> {
        self.navigate(Navigation::Back).await
    }

    /// Undo the last round. Returns how many transcript lines were removed.
    pub async fn withdraw(&self) -> Result<usize, ServiceError> {
        let ticket = self.store.begin_request();
        let (state, cnt) = self.api.navigate(Navigation::Withdraw).await.parse()?.into_parts();

        let removed = self
            .transcript
            .lock()
            .await
            .withdraw(cnt.unwrap_or_default() as usize);
        if let Some(state) = state {
            self.install(ticket, state).await;
        }
        tracing::info!(requested = cnt, removed, "Withdrew messages");
        Ok(removed)
    }
}

/// The player's own line: the backend's echo when it sent one, else the text
/// that was typed with any leading mentions split off.
fn player_message(
    author: &str,
    input: &ActionEntry,
    sent: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> Message {
    match input.content.as_deref() {
        Some(content) => Message::speak(author, content, input.bid.as_slice().to_vec(), now),
        None => {
            let mentions = parse_mentions(sent);
            Message::speak(author, &mentions.message, mentions.roles, now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{
        fixed_now, sample_game_state, sample_game_state_json_for, speak_response,
    };
    use crate::ports::outbound::{MockClockPort, MockRawApiPort};
    use serde_json::json;

    fn clock() -> Arc<dyn ClockPort> {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(fixed_now);
        Arc::new(clock)
    }

    async fn service(raw: MockRawApiPort) -> InteractionService {
        let store = GameStore::new();
        store.replace(sample_game_state()).await;
        InteractionService::new(TheatreApi::new(Arc::new(raw)), store, clock(), "Player")
    }

    #[tokio::test]
    async fn blank_speak_sends_nothing() {
        let raw = MockRawApiPort::new();
        let svc = service(raw).await;
        let outcome = svc.send_action(ActionKind::Speak, "   ", None).await.unwrap();
        assert_eq!(outcome, InteractionOutcome::Skipped);
        assert!(svc.transcript().await.is_empty());
        assert_eq!(svc.phase().await, InteractionPhase::Idle);
    }

    #[tokio::test]
    async fn speak_appends_player_then_characters() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|path, body| {
                path == "/api/interact" && body["type"] == "-speak" && body["message"] == "@Ron hi"
            })
            .returning(|_, _| {
                Ok(speak_response(
                    "hi",
                    json!(["Ron"]),
                    json!([
                        {"x": "-speak", "aid": "Ron", "bid": "Harry", "content": "Hello Harry"},
                        {"x": "-stay", "aid": "Hermione"}
                    ]),
                ))
            });

        let svc = service(raw).await;
        let outcome = svc.send_action(ActionKind::Speak, "@Ron hi", None).await.unwrap();
        assert_eq!(
            outcome,
            InteractionOutcome::Completed {
                appended: 2,
                state_replaced: false
            }
        );

        let transcript = svc.transcript().await;
        let lines: Vec<(&str, &str)> = transcript
            .messages()
            .iter()
            .map(|m| (m.character.as_str(), m.content.as_str()))
            .collect();
        assert_eq!(
            lines,
            vec![("Harry", "@ Ron  hi"), ("Ron", "@ Harry  Hello Harry")]
        );
        assert_eq!(transcript.messages()[0].timestamp, fixed_now());
        assert_eq!(svc.phase().await, InteractionPhase::Appended);
    }

    #[tokio::test]
    async fn done_replaces_state() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json().returning(|_, _| {
            Ok(json!({
                "done": true,
                "action": [],
                "input": {"x": "-stay"},
                "state": sample_game_state_json_for("hp", 2),
            }))
        });

        let svc = service(raw).await;
        let outcome = svc.send_action(ActionKind::Stay, "", None).await.unwrap();
        assert_eq!(
            outcome,
            InteractionOutcome::Completed {
                appended: 0,
                state_replaced: true
            }
        );
        assert_eq!(svc.store.snapshot().await.unwrap().scene_cnt, 2);
    }

    #[tokio::test]
    async fn backend_error_is_rejected_without_mutation() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .returning(|_, _| Ok(json!({"error": "Invalid action"})));

        let svc = service(raw).await;
        let before = svc.store.version().await;
        let err = svc.send_action(ActionKind::Speak, "hi", None).await.unwrap_err();
        assert_eq!(err, ServiceError::Rejected("Invalid action".into()));
        assert!(svc.transcript().await.is_empty());
        assert_eq!(svc.store.version().await, before);
        assert_eq!(svc.phase().await, InteractionPhase::ErroredDisplayed);
    }

    #[tokio::test]
    async fn second_send_while_sending_is_busy() {
        let raw = MockRawApiPort::new();
        let svc = service(raw).await;
        *svc.phase.lock().await = InteractionPhase::Sending;
        let err = svc.send_action(ActionKind::Stay, "", None).await.unwrap_err();
        assert_eq!(err, ServiceError::Busy);
    }

    #[tokio::test]
    async fn withdraw_clamps_and_applies_state() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|_, body| *body == json!({"interact": "withdraw"}))
            .returning(|_, _| Ok(json!({"state": sample_game_state_json_for("hp", 1), "cnt": 5})));

        let svc = service(raw).await;
        svc.transcript
            .lock()
            .await
            .push(Message::speak("Harry", "hello", Vec::new(), fixed_now()));

        assert_eq!(svc.withdraw().await.unwrap(), 1);
        assert!(svc.transcript().await.is_empty());
    }

    #[tokio::test]
    async fn next_scene_accepts_bare_state() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|_, body| *body == json!({"interact": "next"}))
            .returning(|_, _| Ok(sample_game_state_json_for("hp", 2)));

        let svc = service(raw).await;
        let outcome = svc.next_scene().await.unwrap();
        assert!(outcome.is_applied());
        assert!(!outcome.script_changed());
        assert_eq!(svc.store.snapshot().await.unwrap().scene_cnt, 2);
    }

    #[tokio::test]
    async fn script_change_clears_transcript() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .returning(|_, _| Ok(sample_game_state_json_for("romeo", 1)));

        let svc = service(raw).await;
        svc.transcript
            .lock()
            .await
            .push(Message::speak("Harry", "hello", Vec::new(), fixed_now()));
        assert!(svc.back_scene().await.unwrap().script_changed());
        assert!(svc.transcript().await.is_empty());
    }
}
