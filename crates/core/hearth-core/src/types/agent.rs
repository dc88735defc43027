//! Agent identifiers and their static descriptors

use serde::{Deserialize, Serialize};

/// One of the fixed response destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    /// Route Manager: handles ambiguous queries that match both specialists equally
    Triage,
    /// Property Inspector: property issues, damage assessment and image analysis
    PropertyInspector,
    /// Tenancy Expert: rental law, tenant rights and lease questions
    TenancyExpert,
    /// Assistant: asks the user to clarify
    Clarification,
}

/// Static metadata for an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDescriptor {
    /// Agent identifier
    pub id: AgentId,
    /// Display name
    pub name: &'static str,
    /// One-line description shown in the agent panel
    pub description: &'static str,
    /// Label shown while a response from this agent is pending
    pub progress_label: &'static str,
}

const DESCRIPTORS: [AgentDescriptor; 4] = [
    AgentDescriptor {
        id: AgentId::Triage,
        name: "Route Manager",
        description: "Determines the best agent for your query",
        progress_label: "Processing your request...",
    },
    AgentDescriptor {
        id: AgentId::PropertyInspector,
        name: "Property Inspector",
        description: "Specializes in property issues, damage assessment, and maintenance",
        progress_label: "Property Inspector analyzing...",
    },
    AgentDescriptor {
        id: AgentId::TenancyExpert,
        name: "Tenancy Expert",
        description: "Expert in rental laws, tenant rights, and lease agreements",
        progress_label: "Tenancy Expert researching...",
    },
    AgentDescriptor {
        id: AgentId::Clarification,
        name: "Assistant",
        description: "Helps clarify your needs",
        progress_label: "Processing your request...",
    },
];

impl AgentId {
    /// Every agent, in display order
    pub const ALL: [AgentId; 4] = [
        AgentId::Triage,
        AgentId::PropertyInspector,
        AgentId::TenancyExpert,
        AgentId::Clarification,
    ];

    /// The two specialists offered to the user
    pub const SPECIALISTS: [AgentId; 2] = [AgentId::PropertyInspector, AgentId::TenancyExpert];

    /// Static descriptor for this agent
    pub fn descriptor(self) -> &'static AgentDescriptor {
        match self {
            AgentId::Triage => &DESCRIPTORS[0],
            AgentId::PropertyInspector => &DESCRIPTORS[1],
            AgentId::TenancyExpert => &DESCRIPTORS[2],
            AgentId::Clarification => &DESCRIPTORS[3],
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentId::Triage => write!(f, "triage"),
            AgentId::PropertyInspector => write!(f, "property_inspector"),
            AgentId::TenancyExpert => write!(f, "tenancy_expert"),
            AgentId::Clarification => write!(f, "clarification"),
        }
    }
}

/// All agent descriptors, in display order
pub fn agent_descriptors() -> &'static [AgentDescriptor] {
    &DESCRIPTORS
}
