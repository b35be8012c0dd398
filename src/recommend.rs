//! The Recommender: turns a session's participants into a ranked shortlist.
//!
//! Two strategies:
//! - distance priority: meet near the centroid, at whatever hub the place
//!   search finds closest to it;
//! - hotspot priority: meet at the catalog hotspot with the smallest total
//!   travel distance for everyone.

use crate::geo::{self, format_coords, Coordinate};
use crate::hotspots::{Hotspot, HOTSPOTS};
use crate::places::{CategoryCode, HubQuery, PlaceResolver};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// How many candidates a recommendation carries.
pub const TOP_N: usize = 3;

/// First hub search around the centroid.
pub const PRIMARY_HUB: HubQuery = HubQuery::Keyword { text: "지하철역", radius_m: 2000 };
/// Issued once when the primary search fails or finds nothing.
pub const FALLBACK_HUB: HubQuery = HubQuery::Category { code: CategoryCode::Subway, radius_m: 5000 };

/// Ranking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Strategy {
    /// Nearest hubs to the centroid, as ordered by the place search.
    #[default]
    #[serde(rename = "distance")]
    DistancePriority,
    /// Catalog hotspots by total distance to all participants.
    #[serde(rename = "hotspot")]
    HotspotPriority,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::DistancePriority => write!(f, "distance"),
            Strategy::HotspotPriority => write!(f, "hotspot"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distance" | "distance-priority" | "midpoint" => Ok(Strategy::DistancePriority),
            "hotspot" | "hotspot-priority" | "hotplace" => Ok(Strategy::HotspotPriority),
            other => Err(format!("Unknown strategy '{}'. Use 'distance' or 'hotspot'.", other)),
        }
    }
}

/// Why a recommendation could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecommendError {
    #[error("not all participants resolved: participant {} has no location selected", .0 + 1)]
    Unresolved(usize),
    #[error("at least two participants are required, got {0}")]
    TooFewParticipants(usize),
    #[error("participant {} does not exist", .0 + 1)]
    NoSuchParticipant(usize),
    #[error("participant {} has invalid coordinates. Lat: -90..90, Lon: -180..180", .0 + 1)]
    InvalidCoordinate(usize),
}

/// One ranked meeting-point candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateLocation {
    /// 1-based.
    pub rank: usize,
    pub name: String,
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sum of distances to every participant; set by the hotspot ranker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Full recommender output.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub centroid: Coordinate,
    pub formatted_centroid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid_label: Option<String>,
    pub participants: Vec<Coordinate>,
    pub candidates: Vec<CandidateLocation>,
}

impl Recommendation {
    /// Nothing to recommend; callers show "nothing found", not an error.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Rank catalog entries by total distance to all participants, ascending.
///
/// The sort is stable: equal totals keep catalog order.
pub fn rank_hotspots(
    participants: &[Coordinate],
    catalog: &[Hotspot],
    limit: usize,
) -> Vec<CandidateLocation> {
    let mut scored: Vec<(&Hotspot, f64)> = catalog
        .iter()
        .map(|h| (h, geo::total_distance_km(h.coordinate(), participants)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (spot, total))| CandidateLocation {
            rank: i + 1,
            name: spot.name().to_string(),
            coordinate: spot.coordinate(),
            description: Some(spot.description.to_string()),
            total_distance_km: Some(total),
            url: None,
        })
        .collect()
}

/// Hubs near `center` in the order the place search returns them.
///
/// Tries [`PRIMARY_HUB`], then [`FALLBACK_HUB`] once; empty if both come back empty.
pub fn nearest_hubs(center: Coordinate, places: &PlaceResolver, limit: usize) -> Vec<CandidateLocation> {
    let mut hubs = places.hubs(center, &PRIMARY_HUB);
    if hubs.is_empty() {
        info!(primary = %PRIMARY_HUB, fallback = %FALLBACK_HUB, "no hubs from primary search, trying fallback");
        hubs = places.hubs(center, &FALLBACK_HUB);
    }

    hubs.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, place)| CandidateLocation {
            rank: i + 1,
            description: Some(place.address).filter(|a| !a.is_empty()),
            url: Some(place.url).filter(|u| !u.is_empty()),
            name: place.name,
            coordinate: place.coordinate,
            total_distance_km: None,
        })
        .collect()
}

/// The Recommender.
pub struct Recommender<'a> {
    catalog: &'a [Hotspot],
    limit: usize,
}

impl Default for Recommender<'static> {
    fn default() -> Self {
        Self { catalog: HOTSPOTS, limit: TOP_N }
    }
}

impl<'a> Recommender<'a> {
    /// Rank against a different hotspot catalog.
    pub fn with_catalog(catalog: &'a [Hotspot]) -> Self {
        Self { catalog, limit: TOP_N }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Compute a recommendation for a fully resolved session.
    pub fn recommend(
        &self,
        session: &Session,
        places: &PlaceResolver,
    ) -> Result<Recommendation, RecommendError> {
        let participants = session.resolved_coordinates()?;
        let centroid = geo::centroid(&participants)
            .ok_or(RecommendError::TooFewParticipants(participants.len()))?;

        let candidates = match session.strategy {
            Strategy::HotspotPriority => rank_hotspots(&participants, self.catalog, self.limit),
            Strategy::DistancePriority => nearest_hubs(centroid, places, self.limit),
        };
        debug!(strategy = %session.strategy, found = candidates.len(), "ranked candidates");

        Ok(Recommendation {
            strategy: session.strategy,
            centroid,
            formatted_centroid: format_coords(centroid.lat, centroid.lon),
            centroid_label: places.region_label(centroid),
            participants,
            candidates,
        })
    }
}

// ─── Text rendering ─────────────────────────────────────────────

pub fn render_summary(rec: &Recommendation, session: &Session) -> String {
    let mut out = String::new();

    let strategy_label = match rec.strategy {
        Strategy::DistancePriority => "거리 우선",
        Strategy::HotspotPriority => "핫플 우선",
    };
    out.push_str(&format!("  🚇 MIDMEET 추천 ({})\n", strategy_label));
    out.push_str("  ╔══════════════════════════════════════════════════════════════╗\n");

    for p in session.participants() {
        let coords = p
            .location
            .map(|c| format_coords(c.lat, c.lon))
            .unwrap_or_else(|| "────────".to_string());
        out.push_str(&format!("  ║  👤 {:<14} {}\n", p.label(), coords));
    }

    out.push_str("  ╠══════════════════════════════════════════════════════════════╣\n");
    match &rec.centroid_label {
        Some(label) => out.push_str(&format!("  ║  ⊕ 중간 지점  {} ({})\n", rec.formatted_centroid, label)),
        None => out.push_str(&format!("  ║  ⊕ 중간 지점  {}\n", rec.formatted_centroid)),
    }
    out.push_str("  ╠══════════════════════════════════════════════════════════════╣\n");

    if rec.is_empty() {
        out.push_str("  ║  주변에 추천할 장소를 찾을 수 없습니다.\n");
    }
    for c in &rec.candidates {
        let score = c
            .total_distance_km
            .map(|d| format!("  총 {:.1}km", d))
            .unwrap_or_default();
        out.push_str(&format!("  ║  🏆 {}순위: {}{}\n", c.rank, c.name, score));
        if let Some(desc) = &c.description {
            out.push_str(&format!("  ║       {}\n", desc));
        }
    }

    out.push_str("  ╚══════════════════════════════════════════════════════════════╝\n");
    out
}
