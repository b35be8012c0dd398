//! Core types for the place-search subsystem.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a place record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaceSource {
    Cache,
    #[default]
    Kakao,
    Builtin,
}

impl fmt::Display for PlaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "Cache"),
            Self::Kakao => write!(f, "Kakao"),
            Self::Builtin => write!(f, "Built-in"),
        }
    }
}

/// Kakao category group codes used by MIDMEET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryCode {
    /// FD6: restaurants.
    Food,
    /// CE7: cafes.
    Cafe,
    /// CT1: cultural facilities / things to do.
    Culture,
    /// SW8: subway stations.
    Subway,
}

impl CategoryCode {
    pub fn code(self) -> &'static str {
        match self {
            Self::Food => "FD6",
            Self::Cafe => "CE7",
            Self::Culture => "CT1",
            Self::Subway => "SW8",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FD6" => Some(Self::Food),
            "CE7" => Some(Self::Cafe),
            "CT1" => Some(Self::Culture),
            "SW8" => Some(Self::Subway),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Food => "식당",
            Self::Cafe => "카페",
            Self::Culture => "놀거리",
            Self::Subway => "지하철역",
        }
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result ordering requested from the place-search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Accuracy,
    Distance,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Distance => "distance",
        }
    }
}

/// A validated place record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub road_address: Option<String>,
    pub coordinate: Coordinate,
    /// Full category path, e.g. "음식점 > 한식 > 육류,고기".
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_code: Option<CategoryCode>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Distance from the query center in meters, when the query had one.
    #[serde(default)]
    pub distance_m: Option<u32>,
    #[serde(default)]
    pub source: PlaceSource,
}

impl Place {
    /// "강남역 2호선 (서울 강남구 역삼동 858)"
    pub fn display_line(&self) -> String {
        if self.address.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.address)
        }
    }
}

/// A keyword search, optionally centered.
#[derive(Debug, Clone, Default)]
pub struct KeywordQuery {
    pub text: String,
    pub center: Option<Coordinate>,
    pub radius_m: Option<u32>,
    pub sort: SortOrder,
    pub size: Option<u8>,
    pub category: Option<CategoryCode>,
}

impl KeywordQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }
}

/// A category search around a center point.
#[derive(Debug, Clone)]
pub struct CategoryQuery {
    pub category: CategoryCode,
    pub center: Coordinate,
    pub radius_m: u32,
    pub sort: SortOrder,
}

/// How to look for meeting hubs around a centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubQuery {
    Keyword { text: &'static str, radius_m: u32 },
    Category { code: CategoryCode, radius_m: u32 },
}

impl fmt::Display for HubQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword { text, radius_m } => write!(f, "keyword '{}' within {}m", text, radius_m),
            Self::Category { code, radius_m } => write!(f, "category {} within {}m", code, radius_m),
        }
    }
}

/// The external place-search collaborator.
pub trait PlaceSearch: Send + Sync {
    fn search_keyword(&self, query: &KeywordQuery) -> Result<Vec<Place>, PlaceError>;

    fn search_category(&self, query: &CategoryQuery) -> Result<Vec<Place>, PlaceError>;

    /// Administrative region name for a point (e.g. "서울특별시 중구 명동").
    fn region_name(&self, at: Coordinate) -> Result<String, PlaceError>;
}

/// Place search errors.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Place search returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    #[error("No Kakao REST API key configured (set KAKAO_REST_API_KEY)")]
    MissingApiKey,
    #[error("Offline mode: network lookups disabled")]
    Offline,
}
