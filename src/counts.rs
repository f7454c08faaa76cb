use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{DevelopmentCard, Resource};

/// Per-resource tally. Adjustment clamps at zero on the way down and
/// saturates on the way up; a hand count can never go negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceCounts {
    counts: [u8; Resource::ALL.len()],
}

impl ResourceCounts {
    pub const fn zero() -> Self {
        Self {
            counts: [0; Resource::ALL.len()],
        }
    }

    pub fn get(&self, resource: Resource) -> u8 {
        self.counts[resource_index(resource)]
    }

    pub fn adjust(&mut self, resource: Resource, delta: i32) {
        let idx = resource_index(resource);
        self.counts[idx] = clamped(self.counts[idx], delta);
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&v| v as u32).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, u8)> + '_ {
        Resource::ALL.into_iter().zip(self.counts.iter().copied())
    }
}

impl fmt::Display for ResourceCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        for (resource, amount) in self.iter() {
            if amount > 0 {
                parts.push(format!("{amount}x{resource}"));
            }
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Per-development-card tally with the same clamping rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DevCardCounts {
    counts: [u8; DevelopmentCard::ALL.len()],
}

impl DevCardCounts {
    pub const fn zero() -> Self {
        Self {
            counts: [0; DevelopmentCard::ALL.len()],
        }
    }

    pub fn get(&self, card: DevelopmentCard) -> u8 {
        self.counts[card_index(card)]
    }

    pub fn adjust(&mut self, card: DevelopmentCard, delta: i32) {
        let idx = card_index(card);
        self.counts[idx] = clamped(self.counts[idx], delta);
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&v| v as u32).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DevelopmentCard, u8)> + '_ {
        DevelopmentCard::ALL
            .into_iter()
            .zip(self.counts.iter().copied())
    }
}

fn clamped(current: u8, delta: i32) -> u8 {
    (current as i64 + delta as i64).clamp(0, u8::MAX as i64) as u8
}

const fn resource_index(resource: Resource) -> usize {
    match resource {
        Resource::Wood => 0,
        Resource::Brick => 1,
        Resource::Sheep => 2,
        Resource::Wheat => 3,
        Resource::Ore => 4,
    }
}

const fn card_index(card: DevelopmentCard) -> usize {
    match card {
        DevelopmentCard::Knight => 0,
        DevelopmentCard::YearOfPlenty => 1,
        DevelopmentCard::Monopoly => 2,
        DevelopmentCard::RoadBuilding => 3,
        DevelopmentCard::VictoryPoint => 4,
    }
}
