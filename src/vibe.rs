//! Vibe filters: keyword heuristics that reorder or prune venue lists.
//!
//! The behaviour lives in [`VIBE_POLICIES`]; adding a vibe rule means adding a
//! row there, not code.

use crate::places::{CategoryCode, Place};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the group is in the mood for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Vibe {
    #[default]
    Dining,
    Drinking,
    Cafe,
    Study,
}

impl Vibe {
    pub const ALL: [Vibe; 4] = [Vibe::Dining, Vibe::Drinking, Vibe::Cafe, Vibe::Study];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dining => "dining",
            Self::Drinking => "drinking",
            Self::Cafe => "cafe",
            Self::Study => "study",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dining => "🍚 맛집 탐방",
            Self::Drinking => "🍻 술 한잔",
            Self::Cafe => "☕ 카페 수다",
            Self::Study => "📚 조용한 공부",
        }
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vibe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dining" | "food" => Ok(Self::Dining),
            "drinking" | "drink" => Ok(Self::Drinking),
            "cafe" => Ok(Self::Cafe),
            "study" | "quiet" => Ok(Self::Study),
            other => Err(format!(
                "Unknown vibe '{}'. Use 'dining', 'drinking', 'cafe' or 'study'.",
                other
            )),
        }
    }
}

/// How a policy treats entries matching its keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Move matching entries to the front; both groups keep their order.
    Prioritize(&'static [&'static str]),
    /// Drop matching entries; the rest keep their order.
    Exclude(&'static [&'static str]),
}

/// One vibe → one venue list → one rule.
#[derive(Debug, Clone, Copy)]
pub struct VibePolicy {
    pub vibe: Vibe,
    pub category: CategoryCode,
    pub rule: Rule,
}

pub const DRINKING_KEYWORDS: &[&str] =
    &["술집", "호프", "포차", "주점", "이자카야", "고기", "곱창", "맥주"];
pub const STUDY_EXCLUDED: &[&str] = &["보드"];

pub const VIBE_POLICIES: &[VibePolicy] = &[
    VibePolicy {
        vibe: Vibe::Drinking,
        category: CategoryCode::Food,
        rule: Rule::Prioritize(DRINKING_KEYWORDS),
    },
    VibePolicy {
        vibe: Vibe::Study,
        category: CategoryCode::Cafe,
        rule: Rule::Exclude(STUDY_EXCLUDED),
    },
];

fn matches_any(place: &Place, keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|k| place.category.contains(k) || place.name.contains(k))
}

impl Rule {
    pub fn apply(self, places: Vec<Place>) -> Vec<Place> {
        match self {
            Rule::Prioritize(keywords) => {
                let (mut front, back): (Vec<_>, Vec<_>) =
                    places.into_iter().partition(|p| matches_any(p, keywords));
                front.extend(back);
                front
            }
            Rule::Exclude(keywords) => places
                .into_iter()
                .filter(|p| !matches_any(p, keywords))
                .collect(),
        }
    }
}

/// Apply every policy for `vibe` that targets `category`.
/// Lists with no matching policy come back unchanged.
pub fn apply_vibe(vibe: Vibe, category: CategoryCode, places: Vec<Place>) -> Vec<Place> {
    VIBE_POLICIES
        .iter()
        .filter(|p| p.vibe == vibe && p.category == category)
        .fold(places, |acc, policy| policy.rule.apply(acc))
}
