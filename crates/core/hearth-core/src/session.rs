//! Chat session: conversation, user location and the send state machine
//!
//! A session moves `Idle -> AwaitingResponse -> Idle` for every message.
//! [`ChatSession::begin`] records the user turn and hands back a
//! [`PendingExchange`]; the caller runs the responder without holding the
//! session, then calls [`ChatSession::complete`]. A second `begin` while a
//! response is pending is rejected, so at most one request is in flight.

use crate::conversation::ConversationStore;
use crate::responder::Responder;
use crate::router::AgentRouter;
use crate::types::{AgentId, ImageAttachment, RoutingDecision, Turn, UserInput};
use crate::{HearthError, Result};
use serde::Serialize;
use uuid::Uuid;

/// Send state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready to accept a message
    Idle,
    /// A response is being generated; sends are disabled
    AwaitingResponse,
}

/// Everything the responder needs for one message, captured at send time
#[derive(Debug, Clone)]
pub struct PendingExchange {
    /// Routing outcome
    pub decision: RoutingDecision,
    /// Message text as typed; empty for an image-only message
    pub text: String,
    /// Attached image
    pub image: Option<ImageAttachment>,
    /// Turns recorded before this message
    pub context: Vec<Turn>,
    /// Location hint at send time
    pub location: Option<String>,
    user_turn_id: Uuid,
}

impl PendingExchange {
    /// Ask the responder for this exchange's reply
    pub async fn respond(&self, responder: &Responder) -> String {
        responder
            .respond(
                self.decision.destination,
                &self.text,
                self.image.as_ref(),
                &self.context,
                self.location.as_deref(),
            )
            .await
    }

    /// Id of the user turn that opened this exchange
    pub fn user_turn_id(&self) -> Uuid {
        self.user_turn_id
    }
}

/// Session state owned by the presentation layer
#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation: ConversationStore,
    location: String,
    state: SessionState,
    pending_agent: Option<AgentId>,
    pending_turn: Option<Uuid>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Create an idle session with an empty conversation
    pub fn new() -> Self {
        Self {
            conversation: ConversationStore::new(),
            location: String::new(),
            state: SessionState::Idle,
            pending_agent: None,
            pending_turn: None,
        }
    }

    /// Conversation so far
    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    /// Current send state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Free-text location used by the Tenancy Expert
    pub fn location(&self) -> Option<&str> {
        let loc = self.location.trim();
        (!loc.is_empty()).then_some(loc)
    }

    /// Update the location hint
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Agent handling the pending message, else the agent of the latest reply
    pub fn active_agent(&self) -> Option<AgentId> {
        self.pending_agent.or_else(|| {
            self.conversation
                .all()
                .iter()
                .rev()
                .find_map(|t| t.agent_id)
        })
    }

    /// Route a message and record the user turn.
    ///
    /// Returns `Ok(None)` for an empty submission and a `Busy` error while
    /// another response is pending.
    pub fn begin(
        &mut self,
        router: &AgentRouter,
        input: UserInput,
    ) -> Result<Option<PendingExchange>> {
        if input.is_empty() {
            return Ok(None);
        }
        if self.state == SessionState::AwaitingResponse {
            return Err(HearthError::busy("a response is already pending"));
        }

        let context = self.conversation.all().to_vec();
        let decision = router.route(&input.text, input.image.is_some(), &context);
        let user_turn = Turn::user(input.display_text(), input.image.clone());
        let user_turn_id = user_turn.id;
        self.conversation.append(user_turn);
        self.state = SessionState::AwaitingResponse;
        self.pending_agent = Some(decision.destination);
        self.pending_turn = Some(user_turn_id);

        tracing::info!(
            agent = %decision.destination,
            confidence = decision.confidence,
            "message routed to {}",
            decision.destination.name()
        );

        Ok(Some(PendingExchange {
            decision,
            text: input.text,
            image: input.image,
            context,
            location: self.location().map(str::to_string),
            user_turn_id,
        }))
    }

    /// Record the agent's reply and return to `Idle`
    pub fn complete(&mut self, pending: PendingExchange, reply: String) -> Result<&Turn> {
        if self.state != SessionState::AwaitingResponse
            || self.pending_turn != Some(pending.user_turn_id)
        {
            return Err(HearthError::other("no matching response is pending"));
        }
        self.state = SessionState::Idle;
        self.pending_agent = None;
        self.pending_turn = None;
        let turn = Turn::agent(
            pending.decision.destination,
            reply,
            pending.decision.confidence,
        );
        Ok(self.conversation.append(turn))
    }

    /// Drop a pending exchange that will never complete and return to `Idle`.
    ///
    /// The user turn stays in the conversation. Returns `false` if nothing
    /// was pending.
    pub fn abandon(&mut self) -> bool {
        if self.state != SessionState::AwaitingResponse {
            return false;
        }
        tracing::warn!(
            agent = ?self.pending_agent,
            "abandoning pending exchange"
        );
        self.state = SessionState::Idle;
        self.pending_agent = None;
        self.pending_turn = None;
        true
    }

    /// Begin, respond and complete in one call, for single-owner use
    pub async fn send(
        &mut self,
        router: &AgentRouter,
        responder: &Responder,
        input: UserInput,
    ) -> Result<Option<&Turn>> {
        let Some(pending) = self.begin(router, input)? else {
            return Ok(None);
        };
        let reply = pending.respond(responder).await;
        self.complete(pending, reply).map(Some)
    }
}
