//! Session orchestration: one submit-to-terminal-event cycle per turn.

use thiserror::Error;
use uuid::Uuid;

use futures_util::StreamExt;

use crate::client::ChatClient;
use crate::models::{ChatRequest, Message};
use crate::reducer::apply_event;
use crate::state::ConversationStore;

/// Where the controller is in the request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready to accept a submission.
    Idle,
    /// Request sent, waiting for the stream to open.
    Sending,
    /// Frames are being consumed.
    Streaming,
}

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Terminal `done` frame received; open segments were sealed.
    Completed,
    /// The stream ended without a terminal frame. Open segments keep
    /// `streaming = true`.
    Truncated,
    /// The transport failed mid-turn. Open segments keep
    /// `streaming = true`; the error is recorded on the controller.
    Failed,
}

/// Submission rejections. These happen before any state mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Input was empty or whitespace-only.
    #[error("nothing to send: input was empty")]
    EmptyInput,

    /// A previous turn is still in flight.
    #[error("a response is already streaming")]
    Busy,
}

/// Drives one request/response cycle at a time.
///
/// Owns the conversation store and the chat client. A turn appends the
/// user message and an empty assistant placeholder, opens the stream, and
/// folds every decoded event into the placeholder's segment list via the
/// reducer, republishing through the store after each one. At most one
/// stream is open per session; submissions while `Streaming` are rejected
/// outright.
pub struct SessionController {
    client: ChatClient,
    store: ConversationStore,
    session_id: String,
    phase: SessionPhase,
    stream_error: Option<String>,
}

impl SessionController {
    /// Create a controller with a fresh session id and the greeting state.
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            store: ConversationStore::new(),
            session_id: Uuid::new_v4().to_string(),
            phase: SessionPhase::Idle,
            stream_error: None,
        }
    }

    /// The conversation state.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The session identifier sent with every request.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The last transport error, if the previous turn failed.
    pub fn stream_error(&self) -> Option<&str> {
        self.stream_error.as_deref()
    }

    /// Discard all conversation state and return to the greeting.
    ///
    /// No cancellation signal is sent to the backend; the client holds no
    /// stream outside an in-flight `submit`, so there is nothing to detach
    /// here. The backend's session keeps its id.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.stream_error = None;
        self.store.reset();
    }

    /// Submit one user turn and drive it to its end.
    pub async fn submit(&mut self, input: &str) -> Result<TurnOutcome, SessionError> {
        self.submit_with(input, |_| {}).await
    }

    /// Submit one user turn, invoking `on_update` with the assistant
    /// message after every applied event so callers can re-render live.
    pub async fn submit_with(
        &mut self,
        input: &str,
        mut on_update: impl FnMut(&Message),
    ) -> Result<TurnOutcome, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::Busy);
        }
        let input = input.trim();
        if input.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        self.stream_error = None;
        self.phase = SessionPhase::Sending;

        self.store.append_message(Message::user(input));
        let request = ChatRequest::from_history(self.store.messages(), &self.session_id);
        let assistant_id = self.store.append_message(Message::assistant_placeholder());

        let mut stream = match self.client.stream_events(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(error = %e, "failed to open chat stream");
                self.stream_error = Some(e.to_string());
                self.phase = SessionPhase::Idle;
                return Ok(TurnOutcome::Failed);
            }
        };

        self.phase = SessionPhase::Streaming;

        while let Some(result) = stream.next().await {
            match result {
                Ok(event) => {
                    let terminal = event.is_terminal();
                    self.store
                        .replace_segments(&assistant_id, |segments| apply_event(segments, event));
                    if let Some(message) = self.store.message(&assistant_id) {
                        on_update(message);
                    }
                    if terminal {
                        // Dropping the stream closes the transport; any
                        // frames after `done` are never consumed.
                        self.phase = SessionPhase::Idle;
                        return Ok(TurnOutcome::Completed);
                    }
                }
                Err(e) => {
                    // Open reasoning segments stay `streaming = true`; the
                    // turn ends without sealing.
                    tracing::warn!(error = %e, "chat stream failed mid-turn");
                    self.stream_error = Some(e.to_string());
                    self.phase = SessionPhase::Idle;
                    return Ok(TurnOutcome::Failed);
                }
            }
        }

        self.phase = SessionPhase::Idle;
        Ok(TurnOutcome::Truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::models::segment::{Segment, ToolState};
    use crate::models::Role;
    use crate::traits::HttpError;
    use bytes::Bytes;
    use std::sync::Arc;

    fn controller_with_chunks(chunks: &[&str]) -> SessionController {
        let client = ChatClient::with_http_client(
            "http://mock".to_string(),
            Arc::new(MockHttpClient::stream_chunks(chunks)),
        );
        SessionController::new(client)
    }

    #[tokio::test]
    async fn test_simple_turn() {
        let mut session = controller_with_chunks(&[concat!(
            "{\"type\":\"reasoning_chunk\",\"text\":\"thinking\"}\n",
            "{\"type\":\"content_chunk\",\"text\":\"Hello\"}\n",
            "{\"type\":\"content_chunk\",\"text\":\" there\"}\n",
            "{\"type\":\"done\"}\n",
        )]);

        let outcome = session.submit("hi").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(session.phase(), SessionPhase::Idle);

        // greeting + user + assistant
        let messages = session.store().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);

        let assistant = &messages[2];
        assert_eq!(assistant.segments.len(), 2);
        assert!(
            matches!(&assistant.segments[0], Segment::Reasoning(r) if r.content == "thinking" && !r.streaming)
        );
        assert!(matches!(&assistant.segments[1], Segment::Text(t) if t.content == "Hello there"));
    }

    #[tokio::test]
    async fn test_plan_turn_groups_into_execution_log() {
        let mut session = controller_with_chunks(&[concat!(
            "{\"type\":\"tasks\",\"data\":[{\"title\":\"Plan A\",\"items\":[\"step1\"]}]}\n",
            "{\"type\":\"reasoning_chunk\",\"text\":\"x\"}\n",
            "{\"type\":\"tool_call\",\"tool\":{\"toolCallId\":\"1\",\"toolName\":\"search\",\"state\":\"input-available\"}}\n",
            "{\"type\":\"tool_call\",\"tool\":{\"toolCallId\":\"1\",\"toolName\":\"search\",\"state\":\"output-available\",\"result\":\"r\"}}\n",
            "{\"type\":\"done\"}\n",
        )]);

        let outcome = session.submit("build it").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Completed);

        let assistant = session.store().messages().last().unwrap();
        assert_eq!(assistant.segments.len(), 2);
        assert!(matches!(&assistant.segments[0], Segment::TaskPlan(p) if p.tasks.len() == 1));
        match &assistant.segments[1] {
            Segment::ExecutionLog(log) => {
                assert_eq!(log.entries.len(), 2);
                match &log.entries[1] {
                    crate::models::LogEntry::ToolCall(t) => {
                        assert_eq!(t.state, ToolState::OutputAvailable);
                        assert_eq!(t.output.as_deref(), Some("r"));
                    }
                    other => panic!("expected tool call, got {:?}", other),
                }
            }
            other => panic!("expected execution log, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_input_rejected_without_mutation() {
        let mut session = controller_with_chunks(&[]);
        let before = session.store().messages().len();

        let err = session.submit("   ").await.unwrap_err();
        assert_eq!(err, SessionError::EmptyInput);
        assert_eq!(session.store().messages().len(), before);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_busy_rejected() {
        let mut session = controller_with_chunks(&[]);
        session.phase = SessionPhase::Streaming;

        let err = session.submit("hi").await.unwrap_err();
        assert_eq!(err, SessionError::Busy);
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_segments_unsealed() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Stream(vec![
            Ok(Bytes::from(
                "{\"type\":\"reasoning_chunk\",\"text\":\"thinking\"}\n",
            )),
            Err(HttpError::Io("connection reset".to_string())),
        ]));
        let client = ChatClient::with_http_client("http://mock".to_string(), Arc::new(mock));
        let mut session = SessionController::new(client);

        let outcome = session.submit("hi").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Failed);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.stream_error().is_some());

        // Known gap: the open reasoning segment is not sealed.
        let assistant = session.store().messages().last().unwrap();
        assert!(
            matches!(&assistant.segments[0], Segment::Reasoning(r) if r.streaming)
        );
    }

    #[tokio::test]
    async fn test_request_open_failure() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));
        let client = ChatClient::with_http_client("http://mock".to_string(), Arc::new(mock));
        let mut session = SessionController::new(client);

        let outcome = session.submit("hi").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Failed);
        assert!(session.stream_error().unwrap().contains("refused"));
        // User message and placeholder were already appended.
        assert_eq!(session.store().messages().len(), 3);
    }

    #[tokio::test]
    async fn test_stream_end_without_done_is_truncated() {
        let mut session =
            controller_with_chunks(&["{\"type\":\"content_chunk\",\"text\":\"partial\"}\n"]);

        let outcome = session.submit("hi").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Truncated);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.stream_error().is_none());
    }

    #[tokio::test]
    async fn test_on_update_fires_per_event() {
        let mut session = controller_with_chunks(&[concat!(
            "{\"type\":\"content_chunk\",\"text\":\"a\"}\n",
            "{\"type\":\"content_chunk\",\"text\":\"b\"}\n",
            "{\"type\":\"done\"}\n",
        )]);

        let mut updates = 0;
        session
            .submit_with("hi", |_| updates += 1)
            .await
            .unwrap();
        assert_eq!(updates, 3);
    }

    #[tokio::test]
    async fn test_request_carries_full_history() {
        let mock = MockHttpClient::stream_chunks(&["{\"type\":\"done\"}\n"]);
        let client =
            ChatClient::with_http_client("http://mock".to_string(), Arc::new(mock.clone()));
        let mut session = SessionController::new(client);

        session.submit("first").await.unwrap();
        session.submit("second").await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        // Second request includes greeting, first exchange, and the new
        // user message, flattened to {role, content} pairs.
        let body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1]["content"], "first");
        assert_eq!(messages[3]["content"], "second");
        assert_eq!(body["id"], session.session_id());
    }

    #[tokio::test]
    async fn test_reset_restores_greeting() {
        let mut session = controller_with_chunks(&["{\"type\":\"done\"}\n"]);
        session.submit("hi").await.unwrap();
        assert!(session.store().messages().len() > 1);

        session.reset();
        assert_eq!(session.store().messages().len(), 1);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.stream_error().is_none());
    }
}
