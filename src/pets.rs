//! Pet roster
//!
//! Purely cosmetic: the simulation never looks at which pet is flying.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetKind {
    #[default]
    Turtle,
    Bird,
    Rabbit,
    Panda,
}

impl PetKind {
    pub const ALL: [PetKind; 4] = [
        PetKind::Turtle,
        PetKind::Bird,
        PetKind::Rabbit,
        PetKind::Panda,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PetKind::Turtle => "turtle",
            PetKind::Bird => "bird",
            PetKind::Rabbit => "rabbit",
            PetKind::Panda => "panda",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "turtle" => Some(PetKind::Turtle),
            "bird" => Some(PetKind::Bird),
            "rabbit" => Some(PetKind::Rabbit),
            "panda" => Some(PetKind::Panda),
            _ => None,
        }
    }

    pub fn pet(&self) -> &'static Pet {
        match self {
            PetKind::Turtle => &PETS[0],
            PetKind::Bird => &PETS[1],
            PetKind::Rabbit => &PETS[2],
            PetKind::Panda => &PETS[3],
        }
    }
}

/// Display data for a pet (colors are CSS hex strings)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pet {
    pub kind: PetKind,
    pub name: &'static str,
    pub description: &'static str,
    pub body_color: &'static str,
    pub obstacle_color: &'static str,
    pub background_from: &'static str,
    pub background_to: &'static str,
    /// Sprite scale relative to the hitbox
    pub scale: f32,
}

pub static PETS: [Pet; 4] = [
    Pet {
        kind: PetKind::Turtle,
        name: "Shelly",
        description: "A cute turtle that glides through pipes with ease.",
        body_color: "#86efac",
        obstacle_color: "#3b82f6",
        background_from: "#5eead4",
        background_to: "#cffafe",
        scale: 1.2,
    },
    Pet {
        kind: PetKind::Bird,
        name: "Flappy",
        description: "The classic yellow bird that started it all!",
        body_color: "#fef08a",
        obstacle_color: "#22c55e",
        background_from: "#60a5fa",
        background_to: "#bae6fd",
        scale: 2.0,
    },
    Pet {
        kind: PetKind::Rabbit,
        name: "Hoppy",
        description: "A bouncy rabbit with extra jumping power!",
        body_color: "#fbcfe8",
        obstacle_color: "#a855f7",
        background_from: "#e9d5ff",
        background_to: "#fce7f3",
        scale: 1.0,
    },
    Pet {
        kind: PetKind::Panda,
        name: "Bambu",
        description: "A playful panda that loves bamboo pipes!",
        body_color: "#ffffff",
        obstacle_color: "#16a34a",
        background_from: "#10b981",
        background_to: "#dcfce7",
        scale: 1.1,
    },
];

/// Look up a pet by id, falling back to the default pet
pub fn pet_by_id(id: &str) -> &'static Pet {
    PetKind::from_str(id).unwrap_or_default().pet()
}
