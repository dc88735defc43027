//! Keyword-scoring router that picks an agent for each message
//!
//! Scoring is driven by an immutable [`KeywordTable`]: two keyword sets
//! (legal and property-issue), each split into weighted tiers. A set scores
//! `weight` for every tier keyword found as a substring of the lower-cased
//! message. Recent agent turns nudge the scores toward the agent the user
//! was already talking to.

use crate::types::{AgentId, RoutingDecision, Turn, MAX_CONFIDENCE};
use crate::{HearthError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Number of trailing turns inspected for context
pub const CONTEXT_WINDOW: usize = 3;

/// Largest tier weight accepted from a keyword file
pub const MAX_KEYWORD_WEIGHT: u32 = 1000;

/// A weighted group of keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTier {
    /// Tier name (e.g. "strong")
    pub name: String,
    /// Score added per matched keyword
    pub weight: u32,
    /// Keywords, matched as lower-case substrings
    pub keywords: Vec<String>,
}

impl KeywordTier {
    /// Create a tier
    pub fn new(name: impl Into<String>, weight: u32, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            weight,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// `weight` times the number of keywords present in `text_lower`
    fn score(&self, text_lower: &str) -> u32 {
        let hits = self
            .keywords
            .iter()
            .filter(|k| text_lower.contains(k.as_str()))
            .count() as u32;
        hits.saturating_mul(self.weight)
    }
}

/// Tiers belonging to one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    /// Weighted tiers
    pub tiers: Vec<KeywordTier>,
}

impl KeywordSet {
    /// Sum of tier scores for lower-cased text
    pub fn score(&self, text_lower: &str) -> u32 {
        self.tiers
            .iter()
            .fold(0u32, |acc, t| acc.saturating_add(t.score(text_lower)))
    }
}

/// Keyword configuration for both topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    /// Tenancy-law keywords; favour the Tenancy Expert
    pub legal: KeywordSet,
    /// Property-issue keywords; favour the Property Inspector
    pub property_issue: KeywordSet,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            legal: KeywordSet {
                tiers: vec![
                    KeywordTier::new(
                        "strong",
                        3,
                        &[
                            "evict",
                            "eviction",
                            "deposit",
                            "lease",
                            "landlord",
                            "tenant",
                            "rent increase",
                            "notice period",
                            "tenancy law",
                            "rental agreement",
                        ],
                    ),
                    KeywordTier::new(
                        "medium",
                        2,
                        &[
                            "contract",
                            "legal",
                            "rights",
                            "law",
                            "agreement",
                            "rental",
                            "vacancy",
                            "subletting",
                        ],
                    ),
                    KeywordTier::new("weak", 1, &["rent", "payment", "move out", "move in"]),
                ],
            },
            property_issue: KeywordSet {
                tiers: vec![
                    KeywordTier::new(
                        "strong",
                        3,
                        &[
                            "damage",
                            "broken",
                            "crack",
                            "leak",
                            "mold",
                            "mould",
                            "water damage",
                            "structural",
                            "electrical",
                            "plumbing",
                        ],
                    ),
                    KeywordTier::new(
                        "medium",
                        2,
                        &[
                            "repair",
                            "fix",
                            "problem",
                            "issue",
                            "maintenance",
                            "paint",
                            "wall",
                            "ceiling",
                            "floor",
                        ],
                    ),
                    KeywordTier::new(
                        "weak",
                        1,
                        &["lighting", "fixture", "door", "window", "heating", "cooling"],
                    ),
                ],
            },
        }
    }
}

impl KeywordTable {
    /// Parse a table from JSON, lower-casing every keyword
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: KeywordTable = serde_json::from_str(json)?;
        table.normalized()
    }

    /// Load a table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_json_str(&raw)?;
        tracing::info!("Loaded routing keywords from {}", path.as_ref().display());
        Ok(table)
    }

    fn normalized(mut self) -> Result<Self> {
        for set in [&mut self.legal, &mut self.property_issue] {
            for tier in &mut set.tiers {
                if tier.weight > MAX_KEYWORD_WEIGHT {
                    return Err(HearthError::validation(format!(
                        "weight {} in tier '{}' exceeds {}",
                        tier.weight, tier.name, MAX_KEYWORD_WEIGHT
                    )));
                }
                for keyword in &mut tier.keywords {
                    *keyword = keyword.trim().to_lowercase();
                    // an empty needle would match every message
                    if keyword.is_empty() {
                        return Err(HearthError::validation(format!(
                            "empty keyword in tier '{}'",
                            tier.name
                        )));
                    }
                }
            }
        }
        Ok(self)
    }
}

/// Raw scores behind a routing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteScores {
    /// Tenancy-law evidence
    pub legal: u32,
    /// Property-issue evidence
    pub issue: u32,
}

impl RouteScores {
    /// `max / max(total, 1) * 100`, capped at 95
    pub fn confidence(&self) -> f64 {
        let total = self.legal.saturating_add(self.issue).max(1) as f64;
        let best = self.legal.max(self.issue) as f64;
        (best / total * 100.0).min(MAX_CONFIDENCE)
    }

    /// Agent favoured by these scores
    pub fn destination(&self) -> AgentId {
        if self.legal > self.issue && self.legal > 0 {
            AgentId::TenancyExpert
        } else if self.issue > self.legal && self.issue > 0 {
            AgentId::PropertyInspector
        } else if self.legal == 0 && self.issue == 0 {
            AgentId::Clarification
        } else {
            AgentId::Triage
        }
    }
}

/// Router for agent selection
#[derive(Debug, Clone, Default)]
pub struct AgentRouter {
    table: KeywordTable,
}

impl AgentRouter {
    /// Create a router over a keyword table
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    /// Keyword table in use
    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// Keyword and context scores for a text message
    pub fn score(&self, text: &str, context: &[Turn]) -> RouteScores {
        let text_lower = text.to_lowercase();
        let mut scores = RouteScores {
            legal: self.table.legal.score(&text_lower),
            issue: self.table.property_issue.score(&text_lower),
        };

        let start = context.len().saturating_sub(CONTEXT_WINDOW);
        for turn in &context[start..] {
            match turn.agent_id {
                Some(AgentId::PropertyInspector) => {
                    scores.issue = scores.issue.saturating_add(1)
                }
                Some(AgentId::TenancyExpert) => scores.legal = scores.legal.saturating_add(1),
                _ => {}
            }
        }
        scores
    }

    /// Pick an agent for a message.
    ///
    /// Images always go to the Property Inspector at confidence 95.
    pub fn route(&self, text: &str, has_image: bool, context: &[Turn]) -> RoutingDecision {
        if has_image {
            return RoutingDecision::new(AgentId::PropertyInspector, MAX_CONFIDENCE);
        }

        let scores = self.score(text, context);
        let decision = RoutingDecision::new(scores.destination(), scores.confidence());
        tracing::debug!(
            legal = scores.legal,
            issue = scores.issue,
            destination = %decision.destination,
            confidence = decision.confidence,
            "routed message"
        );
        decision
    }
}

/// Route with the built-in keyword table
pub fn route(text: &str, has_image: bool, context: &[Turn]) -> RoutingDecision {
    static DEFAULT_ROUTER: OnceLock<AgentRouter> = OnceLock::new();
    DEFAULT_ROUTER
        .get_or_init(AgentRouter::default)
        .route(text, has_image, context)
}
