//! Integration tests for Hearth core
//!
//! Drive the router, responder and session together through the public API,
//! with a scripted answer service standing in for the model.

use hearth_core::testing::ScriptedAnswerService;
use hearth_core::*;
use std::io::Write;
use std::sync::Arc;

const PNG_B64: &str = "iVBORw0KGgo=";

fn responder(service: Arc<ScriptedAnswerService>) -> Responder {
    Responder::new(service, ResponderConfig::default()).unwrap()
}

fn agent_turns(agent: AgentId, n: usize) -> Vec<Turn> {
    (0..n).map(|_| Turn::agent(agent, "earlier", 80.0)).collect()
}

#[test]
fn test_images_always_route_to_inspector() {
    let texts = ["", "my landlord kept my deposit", "hello", "lease lease lease"];
    let contexts = [Vec::new(), agent_turns(AgentId::TenancyExpert, 3)];

    for text in texts {
        for context in &contexts {
            let decision = route(text, true, context);
            assert_eq!(decision.destination, AgentId::PropertyInspector);
            assert_eq!(decision.confidence, 95.0);
        }
    }
}

#[test]
fn test_eviction_notice_goes_to_tenancy_expert() {
    let decision = route("my landlord gave me an eviction notice", false, &[]);
    assert_eq!(decision.destination, AgentId::TenancyExpert);
    assert!(decision.confidence > 50.0);
}

#[test]
fn test_ceiling_leak_goes_to_inspector() {
    let decision = route("there is a water leak in the ceiling", false, &[]);
    assert_eq!(decision.destination, AgentId::PropertyInspector);
    assert_eq!(decision.confidence, 95.0);
}

#[test]
fn test_no_keywords_means_clarification() {
    let decision = route("hello", false, &[]);
    assert_eq!(decision.destination, AgentId::Clarification);
    assert_eq!(decision.confidence, 0.0);
}

#[test]
fn test_recent_history_breaks_zero_tie() {
    let context = agent_turns(AgentId::PropertyInspector, 3);
    let router = AgentRouter::default();

    let scores = router.score("what do you think?", &context);
    assert_eq!(scores, RouteScores { legal: 0, issue: 3 });

    let decision = router.route("what do you think?", false, &context);
    assert_eq!(decision.destination, AgentId::PropertyInspector);
}

#[test]
fn test_route_is_pure() {
    let context = agent_turns(AgentId::TenancyExpert, 2);
    let a = route("rent and the door", false, &context);
    let b = route("rent and the door", false, &context);
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_failed_call_returns_fallback_verbatim() {
    let responder = responder(Arc::new(ScriptedAnswerService::failing()));

    for agent in AgentId::ALL {
        let text = "they want to evict me over a leak";
        let reply = responder.respond(agent, text, None, &[], None).await;
        assert_eq!(reply, fallback_text(agent, text));
    }

    let with_eviction = fallback_text(AgentId::TenancyExpert, "Eviction notice today");
    assert!(with_eviction.contains("EVICTION NOTICE RECEIVED?"));
    let without = fallback_text(AgentId::TenancyExpert, "deposit question");
    assert!(!without.contains("EVICTION NOTICE RECEIVED?"));
}

#[tokio::test]
async fn test_tie_triages_with_short_budget() {
    let service = Arc::new(ScriptedAnswerService::new(vec![Ok(
        "This sounds like both a repair and a lease matter.".into(),
    )]));
    let responder = responder(service.clone());
    let mut session = ChatSession::new();

    let turn = session
        .send(
            &AgentRouter::default(),
            &responder,
            UserInput::text("rent and the door"),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(turn.agent_id, Some(AgentId::Triage));
    assert_eq!(turn.confidence, Some(50.0));
    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].max_tokens, 600);
    assert!(requests[0].image.is_none());
}

#[tokio::test]
async fn test_multi_turn_conversation() {
    let service = Arc::new(ScriptedAnswerService::new(vec![
        Ok("That looks like water damage on plasterboard.".into()),
        Ok("Ask your landlord to arrange the repair in writing.".into()),
    ]));
    let responder = responder(service.clone());
    let router = AgentRouter::default();
    let mut session = ChatSession::new();
    session.set_location("Bristol, UK");

    let image = ImageAttachment::from_data_url(&format!("data:image/png;base64,{}", PNG_B64))
        .unwrap();
    let first = session
        .send(&router, &responder, UserInput::with_image("", image))
        .await
        .unwrap()
        .unwrap()
        .clone();
    assert_eq!(first.agent_id, Some(AgentId::PropertyInspector));

    let second = session
        .send(
            &router,
            &responder,
            UserInput::text("can my landlord keep my deposit over this?"),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
    assert_eq!(second.agent_id, Some(AgentId::TenancyExpert));

    let turns = session.conversation().all();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].text, "Image uploaded for analysis");
    assert!(turns[0].image.is_some());
    assert_eq!(turns[1].id, first.id);
    assert_eq!(turns[3].id, second.id);
    assert!(turns.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let requests = service.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].max_tokens, 1200);
    assert_eq!(requests[0].image.as_ref().unwrap().data, PNG_B64);
    // tenancy prompt carries prior history and location, but never the image
    assert!(requests[1].image.is_none());
    assert!(requests[1].prompt.contains("user: Image uploaded for analysis"));
    assert!(requests[1]
        .prompt
        .contains("agent: That looks like water damage on plasterboard."));
    assert!(requests[1].prompt.contains("Bristol, UK"));
    assert_eq!(session.active_agent(), Some(AgentId::TenancyExpert));
}

#[test]
fn test_custom_keyword_table_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "legal": {{ "tiers": [{{ "name": "strong", "weight": 3, "keywords": ["Mietvertrag"] }}] }},
            "property_issue": {{ "tiers": [{{ "name": "strong", "weight": 3, "keywords": ["Schimmel"] }}] }}
        }}"#
    )
    .unwrap();

    let router = AgentRouter::new(KeywordTable::from_file(file.path()).unwrap());
    assert_eq!(router.table().legal.tiers[0].keywords, vec!["mietvertrag"]);

    let decision = router.route("Schimmel im Bad", false, &[]);
    assert_eq!(decision.destination, AgentId::PropertyInspector);
    let decision = router.route("Frage zum MIETVERTRAG", false, &[]);
    assert_eq!(decision.destination, AgentId::TenancyExpert);
    // built-in English keywords are gone
    assert_eq!(
        router.route("my landlord", false, &[]).destination,
        AgentId::Clarification
    );
}
