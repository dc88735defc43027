//! Responder facade: turns a routing decision into agent text
//!
//! Each destination gets its own prompt, rendered from the conversation and
//! sent to an [`AnswerService`]. Failures never escape: the caller always
//! receives text, falling back to a static advisory message per agent.

use crate::config::ModelConfig;
use crate::templates::{self, TemplateEngine};
use crate::types::{AgentId, ImageAttachment, Turn};
use crate::Result;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Number of trailing turns quoted in the triage prompt
const TRIAGE_CONTEXT_TURNS: usize = 2;

/// One outbound answer-generation request
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRequest {
    /// Model identifier
    pub model: String,
    /// Token budget
    pub max_tokens: usize,
    /// Rendered instruction text
    pub prompt: String,
    /// Image to send alongside the prompt
    pub image: Option<ImageAttachment>,
}

/// External service that produces answer text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Generate an answer; any failure is reported as an error
    async fn generate(&self, request: AnswerRequest) -> Result<String>;
}

/// Model settings used by the responder
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Model identifier
    pub model: String,
    /// Token budget for the Property Inspector and Tenancy Expert
    pub specialist_max_tokens: usize,
    /// Token budget for triage
    pub triage_max_tokens: usize,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        ResponderConfig::from(&ModelConfig::default())
    }
}

impl From<&ModelConfig> for ResponderConfig {
    fn from(config: &ModelConfig) -> Self {
        Self {
            model: config.model.clone(),
            specialist_max_tokens: config.specialist_max_tokens,
            triage_max_tokens: config.triage_max_tokens,
        }
    }
}

/// Builds prompts per agent and forwards them to an answer service
pub struct Responder {
    service: Arc<dyn AnswerService>,
    templates: TemplateEngine,
    config: ResponderConfig,
}

impl Responder {
    /// Create a responder over a service
    pub fn new(service: Arc<dyn AnswerService>, config: ResponderConfig) -> Result<Self> {
        Ok(Self {
            service,
            templates: TemplateEngine::new()?,
            config,
        })
    }

    /// Produce the agent's reply. Never fails; at most one outbound call.
    pub async fn respond(
        &self,
        destination: AgentId,
        text: &str,
        image: Option<&ImageAttachment>,
        context: &[Turn],
        location: Option<&str>,
    ) -> String {
        let request = match self.build_request(destination, text, image, context, location) {
            Ok(Some(request)) => request,
            Ok(None) => return clarification_text().to_string(),
            Err(e) => {
                tracing::warn!("Failed to build {} prompt: {}", destination, e);
                return fallback_text(destination, text);
            }
        };

        match self.service.generate(request).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("{} answer failed, using fallback: {}", destination.name(), e);
                fallback_text(destination, text)
            }
        }
    }

    /// Outbound request for a destination; `None` for clarification, which is static
    pub fn build_request(
        &self,
        destination: AgentId,
        text: &str,
        image: Option<&ImageAttachment>,
        context: &[Turn],
        location: Option<&str>,
    ) -> Result<Option<AnswerRequest>> {
        let mut data: HashMap<String, serde_json::Value> = HashMap::new();
        data.insert("MESSAGE_TEXT".into(), json!(text));

        let (template, max_tokens, image) = match destination {
            AgentId::Clarification => return Ok(None),
            AgentId::PropertyInspector => {
                data.insert("RECENT_MESSAGES".into(), json!(format_history(context)));
                data.insert("HAS_IMAGE".into(), json!(image.is_some()));
                (
                    templates::PROPERTY_INSPECTOR,
                    self.config.specialist_max_tokens,
                    image.cloned(),
                )
            }
            AgentId::TenancyExpert => {
                data.insert("RECENT_MESSAGES".into(), json!(format_history(context)));
                if let Some(loc) = location.map(str::trim).filter(|l| !l.is_empty()) {
                    data.insert("LOCATION".into(), json!(loc));
                }
                (
                    templates::TENANCY_EXPERT,
                    self.config.specialist_max_tokens,
                    None,
                )
            }
            AgentId::Triage => {
                let start = context.len().saturating_sub(TRIAGE_CONTEXT_TURNS);
                let recent: Vec<&str> = context[start..].iter().map(|t| t.text.as_str()).collect();
                data.insert("RECENT_CONTEXT".into(), json!(recent.join(" | ")));
                (templates::TRIAGE, self.config.triage_max_tokens, None)
            }
        };

        let prompt = self.templates.render_named(template, &data)?;
        Ok(Some(AnswerRequest {
            model: self.config.model.clone(),
            max_tokens,
            prompt,
            image,
        }))
    }
}

/// `<role>: <text>` per turn, one per line
pub fn format_history(context: &[Turn]) -> String {
    context
        .iter()
        .map(|t| format!("{}: {}", t.role.as_str(), t.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Static reply for the clarification agent
pub fn clarification_text() -> &'static str {
    CLARIFICATION_TEXT
}

/// Static text returned when a destination's answer cannot be generated
pub fn fallback_text(destination: AgentId, text: &str) -> String {
    match destination {
        AgentId::PropertyInspector => PROPERTY_INSPECTOR_FALLBACK.to_string(),
        AgentId::TenancyExpert => tenancy_expert_fallback(text),
        AgentId::Triage | AgentId::Clarification => CLARIFICATION_TEXT.to_string(),
    }
}

fn tenancy_expert_fallback(text: &str) -> String {
    let eviction = if text.to_lowercase().contains("evict") {
        "**EVICTION NOTICE RECEIVED?**\n\
         - Don't ignore it\n\
         - Seek immediate legal help\n\
         - Know your response timeline\n\n"
    } else {
        ""
    };
    format!(
        "{}{}{}",
        TENANCY_EXPERT_FALLBACK_HEAD, eviction, TENANCY_EXPERT_FALLBACK_TAIL
    )
}

const PROPERTY_INSPECTOR_FALLBACK: &str = "🔧 **Property Inspector Error**

I'm experiencing technical difficulties right now. However, I can offer some general guidance:

If this is a **safety issue** (gas leaks, electrical problems, structural damage):
- Contact professionals immediately
- Evacuate if necessary
- Document with photos

For **non-urgent issues**:
- Take detailed photos
- Note when the problem started
- Check if it affects daily living

Could you describe the issue in more detail so I can provide better guidance even without full system access?";

const TENANCY_EXPERT_FALLBACK_HEAD: &str = "⚖️ **Tenancy Expert Error**

I'm having technical difficulties, but here's some general guidance:

**For immediate tenancy issues:**
- Document everything in writing
- Keep all communication records
- Know your local tenant rights organization
- Check your lease agreement first

**Common resources:**
- Local housing authority
- Tenant rights organizations
- Legal aid societies
- Small claims court (for deposits)

";

const TENANCY_EXPERT_FALLBACK_TAIL: &str =
    "Could you rephrase your question? I'll do my best to help with the information I can access.";

const CLARIFICATION_TEXT: &str = "🤔 **I'm here to help, but need a bit more information!**

I specialize in two main areas:

🔧 **Property Issues & Maintenance**
- Damage assessment (water, structural, electrical)
- Repair recommendations and troubleshooting
- Safety concerns and urgent fixes
- Upload photos for detailed analysis

📋 **Tenancy & Rental Law**
- Lease agreements and tenant rights
- Landlord responsibilities and disputes
- Eviction notices and deposit issues
- Location-specific rental law guidance

**To get the best help:**
- Be specific about your situation
- Upload photos if it's a physical problem
- Mention your location for legal questions
- Let me know if it's urgent

What's your specific question or concern?";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HearthError;
    use mockall::predicate::always;

    fn responder(service: MockAnswerService) -> Responder {
        Responder::new(Arc::new(service), ResponderConfig::default()).unwrap()
    }

    fn png() -> ImageAttachment {
        ImageAttachment::new("image/png", "aGVsbG8=").unwrap()
    }

    #[tokio::test]
    async fn test_clarification_makes_no_call() {
        let mut service = MockAnswerService::new();
        service.expect_generate().times(0);

        let reply = responder(service)
            .respond(AgentId::Clarification, "hello", None, &[], None)
            .await;
        assert_eq!(reply, clarification_text());
    }

    #[tokio::test]
    async fn test_inspector_sends_image_and_budget() {
        let mut service = MockAnswerService::new();
        service
            .expect_generate()
            .withf(|req| {
                req.max_tokens == 1200
                    && req.model == "claude-sonnet-4-20250514"
                    && req.image.as_ref().map(|i| i.media_type.as_str()) == Some("image/png")
                    && req.prompt.contains("IMAGE PROVIDED")
                    && req.prompt.contains("CURRENT REQUEST: \"what is this stain?\"")
            })
            .times(1)
            .returning(|_| Ok("looks like mould".to_string()));

        let image = png();
        let reply = responder(service)
            .respond(
                AgentId::PropertyInspector,
                "what is this stain?",
                Some(&image),
                &[],
                None,
            )
            .await;
        assert_eq!(reply, "looks like mould");
    }

    #[tokio::test]
    async fn test_tenancy_prompt_embeds_history_and_location() {
        let context = vec![
            Turn::user("my deposit was kept", None),
            Turn::agent(AgentId::TenancyExpert, "tell me more", 95.0),
        ];
        let mut service = MockAnswerService::new();
        service
            .expect_generate()
            .withf(|req| {
                req.image.is_none()
                    && req.prompt.contains("user: my deposit was kept\nagent: tell me more")
                    && req.prompt.contains("USER LOCATION: Toronto")
            })
            .times(1)
            .returning(|_| Ok("ok".to_string()));

        let reply = responder(service)
            .respond(
                AgentId::TenancyExpert,
                "can they do that?",
                None,
                &context,
                Some("  Toronto "),
            )
            .await;
        assert_eq!(reply, "ok");
    }

    #[tokio::test]
    async fn test_tenancy_never_sends_image() {
        let mut service = MockAnswerService::new();
        service
            .expect_generate()
            .withf(|req| req.image.is_none())
            .times(1)
            .returning(|_| Ok("ok".to_string()));

        let image = png();
        responder(service)
            .respond(AgentId::TenancyExpert, "lease", Some(&image), &[], None)
            .await;
    }

    #[tokio::test]
    async fn test_triage_uses_last_two_context_texts() {
        let context = vec![
            Turn::user("one", None),
            Turn::user("two", None),
            Turn::user("three", None),
        ];
        let mut service = MockAnswerService::new();
        service
            .expect_generate()
            .withf(|req| req.max_tokens == 600 && req.prompt.contains("CONTEXT: two | three"))
            .times(1)
            .returning(|_| Ok("routing advice".to_string()));

        let reply = responder(service)
            .respond(AgentId::Triage, "lease crack", None, &context, None)
            .await;
        assert_eq!(reply, "routing advice");
    }

    #[tokio::test]
    async fn test_failures_return_fallbacks() {
        for (agent, expected_start) in [
            (AgentId::PropertyInspector, "🔧 **Property Inspector Error**"),
            (AgentId::TenancyExpert, "⚖️ **Tenancy Expert Error**"),
            (AgentId::Triage, "🤔 **I'm here to help"),
        ] {
            let mut service = MockAnswerService::new();
            service
                .expect_generate()
                .with(always())
                .times(1)
                .returning(|_| Err(HearthError::model("Anthropic API error: 500")));

            let reply = responder(service)
                .respond(agent, "something broke", None, &[], None)
                .await;
            assert!(reply.starts_with(expected_start), "{}: {}", agent, reply);
            assert_eq!(reply, fallback_text(agent, "something broke"));
        }
    }

    #[test]
    fn test_eviction_fallback_section() {
        let with = fallback_text(AgentId::TenancyExpert, "They want to EVICT me");
        assert!(with.contains("**EVICTION NOTICE RECEIVED?**"));
        assert!(with.contains("- Seek immediate legal help"));

        let without = fallback_text(AgentId::TenancyExpert, "deposit question");
        assert!(!without.contains("EVICTION"));
        assert!(without.ends_with("with the information I can access."));
    }

    #[test]
    fn test_format_history() {
        let context = vec![
            Turn::user("a", None),
            Turn::agent(AgentId::Clarification, "b", 0.0),
        ];
        assert_eq!(format_history(&context), "user: a\nagent: b");
        assert_eq!(format_history(&[]), "");
    }
}
