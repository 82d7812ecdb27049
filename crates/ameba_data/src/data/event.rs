use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened, and to whom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Predation {
        predator: Uuid,
        victim: Uuid,
    },
    /// Emitted when an organism starves. The name is kept for consumers
    /// that already key on it.
    Evolve {
        organism: Uuid,
    },
    FoodConsumed {
        organism: Uuid,
        food: Uuid,
    },
    Birth {
        parent: Option<Uuid>,
        child: Uuid,
    },
    Mutation {
        organism: Uuid,
    },
}

impl EventKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Predation { .. } => "predation",
            Self::Evolve { .. } => "evolve",
            Self::FoodConsumed { .. } => "food_consumed",
            Self::Birth { .. } => "birth",
            Self::Mutation { .. } => "mutation",
        }
    }
}

/// An immutable entry of the world's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    /// Free-form detail; carries the mutated DNA for mutation events.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
    /// Milliseconds since the Unix epoch.
    pub at: i64,
    pub tick: u64,
}

impl Event {
    #[must_use]
    pub fn new(kind: EventKind, tick: u64, at: i64) -> Self {
        Self {
            kind,
            detail: String::new(),
            at,
            tick,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

/// Echo of an external touch, kept for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchStimulus {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub amplitude: f64,
    pub sigma: f64,
    pub created_at: i64,
}
