use crate::config::Tunables;
use crate::metrics::MetricsSnapshot;
use ameba_data::{Food, LifeState, Organism};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganismView {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub energy: f64,
    pub generation: u32,
    pub dna_layers: Vec<String>,
    pub state: LifeState,
}

impl From<&Organism> for OrganismView {
    fn from(o: &Organism) -> Self {
        Self {
            id: o.id,
            x: o.position.x,
            y: o.position.y,
            size: o.size,
            energy: o.energy,
            generation: o.generation,
            dna_layers: o.dna_layers.clone(),
            state: o.state,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FoodView {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub energy: f64,
}

impl From<&Food> for FoodView {
    fn from(f: &Food) -> Self {
        Self {
            id: f.id,
            x: f.position.x,
            y: f.position.y,
            energy: f.energy,
        }
    }
}

/// Tunables plus the fixed world dimensions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    #[serde(flatten)]
    pub tunables: Tunables,
    pub world_width: f64,
    pub world_height: f64,
}

/// Immutable view of a world published after every tick or command.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub organisms: Vec<OrganismView>,
    pub food: Vec<FoodView>,
    pub metrics: MetricsSnapshot,
    pub config: ConfigSnapshot,
}
