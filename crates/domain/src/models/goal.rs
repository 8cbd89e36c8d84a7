//! Goal tier and package-to-subcategory mappings.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Priority rank of a user-selected goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTier {
    Tier1,
    Tier2,
    Tier3,
}

impl GoalTier {
    /// Map the goal store's relationship label to a tier.
    ///
    /// Unknown labels yield `None` and the goal is ignored.
    pub fn from_relationship(relationship: &str) -> Option<Self> {
        match relationship.trim().to_ascii_lowercase().as_str() {
            "primary" => Some(Self::Tier1),
            "secondary" => Some(Self::Tier2),
            "tertiary" => Some(Self::Tier3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tier1 => "tier1",
            Self::Tier2 => "tier2",
            Self::Tier3 => "tier3",
        }
    }
}

/// Per-user snapshot of goal subcategories grouped by tier.
///
/// Read-only for the lifetime of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalTierMap {
    pub tier1: BTreeSet<String>,
    pub tier2: BTreeSet<String>,
    pub tier3: BTreeSet<String>,
}

impl GoalTierMap {
    pub fn insert(&mut self, tier: GoalTier, subcategory: impl Into<String>) {
        let set = match tier {
            GoalTier::Tier1 => &mut self.tier1,
            GoalTier::Tier2 => &mut self.tier2,
            GoalTier::Tier3 => &mut self.tier3,
        };
        set.insert(subcategory.into());
    }

    pub fn get(&self, tier: GoalTier) -> &BTreeSet<String> {
        match tier {
            GoalTier::Tier1 => &self.tier1,
            GoalTier::Tier2 => &self.tier2,
            GoalTier::Tier3 => &self.tier3,
        }
    }

    /// All subcategories the user cares about, across every tier.
    pub fn flatten(&self) -> BTreeSet<String> {
        self.tier1
            .iter()
            .chain(self.tier2.iter())
            .chain(self.tier3.iter())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tier1.is_empty() && self.tier2.is_empty() && self.tier3.is_empty()
    }
}

/// Mapping from app package identifier to the goal subcategories that app
/// satisfies. Read-only per-request snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageGoalMap(HashMap<String, BTreeSet<String>>);

impl PackageGoalMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, package: impl Into<String>, subcategory: impl Into<String>) {
        self.0
            .entry(package.into())
            .or_default()
            .insert(subcategory.into());
    }

    pub fn subcategories_for(&self, package: &str) -> Option<&BTreeSet<String>> {
        self.0.get(package)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
