//! Hearth core
//!
//! Routing, prompting and session state for a multi-agent property and
//! tenancy assistant:
//!
//! - Keyword-scoring router that picks one of four agents per message
//! - Responder facade that renders agent prompts and calls an answer service
//! - Append-only conversation store and a single-in-flight chat session
//!
//! # Example
//!
//! ```no_run
//! use hearth_core::*;
//! use std::sync::Arc;
//!
//! # async fn run(service: Arc<dyn AnswerService>) -> Result<()> {
//! let router = AgentRouter::default();
//! let responder = Responder::new(service, ResponderConfig::default())?;
//! let mut session = ChatSession::new();
//!
//! if let Some(turn) = session
//!     .send(&router, &responder, UserInput::text("my ceiling is leaking"))
//!     .await?
//! {
//!     println!("{}: {}", turn.agent_id.map(|a| a.name()).unwrap_or("?"), turn.text);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod conversation;
pub mod error;
pub mod responder;
pub mod router;
pub mod session;
pub mod templates;
pub mod testing;
pub mod types;
pub mod utils;

pub use config::{
    get_env_int, get_env_opt, get_env_or, get_required_env, load_env, HearthConfig, ModelConfig,
    UiConfig,
};
pub use conversation::ConversationStore;
pub use error::{HearthError, Result};
pub use responder::{
    clarification_text, fallback_text, AnswerRequest, AnswerService, Responder, ResponderConfig,
};
pub use router::{route, AgentRouter, KeywordSet, KeywordTable, KeywordTier, RouteScores};
pub use session::{ChatSession, PendingExchange, SessionState};
pub use templates::TemplateEngine;
pub use types::*;
pub use utils::init_logging;
