//! Place resolver: best-effort front for the place-search collaborator.
//!
//! Address flow: cache → collaborator keyword search → built-in hotspots → empty
//! Nearby/hub flow: collaborator → empty
//!
//! Collaborator failures never escape this module; they are logged and become
//! empty lists.

use super::cache::SearchCache;
use super::kakao::KakaoClient;
use super::types::{
    CategoryCode, CategoryQuery, HubQuery, KeywordQuery, Place, PlaceError, PlaceSearch,
    PlaceSource, SortOrder,
};
use crate::config::Config;
use crate::geo::Coordinate;
use crate::hotspots::{self, Hotspot};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Result size for address searches.
pub const ADDRESS_RESULT_SIZE: u8 = 10;
/// Radius for venue category searches around a meeting point.
pub const NEARBY_RADIUS_M: u32 = 1500;
/// Result size for hub searches.
pub const HUB_RESULT_SIZE: u8 = 10;

/// Shared between request handlers; only the cache is locked, and never across a network call.
pub struct PlaceResolver {
    source: Box<dyn PlaceSearch>,
    cache: Mutex<SearchCache>,
    offline: bool,
}

impl PlaceResolver {
    pub fn new(source: Box<dyn PlaceSearch>, cache: SearchCache) -> Self {
        Self { source, cache: Mutex::new(cache), offline: false }
    }

    /// Kakao-backed resolver using the configured key and cache path.
    pub fn from_config(config: &Config) -> Self {
        let client = KakaoClient::new(config.kakao_api_key.clone());
        if !client.has_api_key() {
            warn!("KAKAO_REST_API_KEY is not set; place searches will fall back to built-in data");
        }
        let cache = match &config.cache_path {
            Some(path) => SearchCache::load_from(path.clone()),
            None => SearchCache::load(),
        };
        Self::new(Box::new(client), cache)
    }

    /// Set offline mode — skip network calls.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    fn cache(&self) -> MutexGuard<'_, SearchCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn online(&self) -> Result<&dyn PlaceSearch, PlaceError> {
        if self.offline {
            Err(PlaceError::Offline)
        } else {
            Ok(self.source.as_ref())
        }
    }

    /// Search for a participant's starting point by free text.
    pub fn search_address(&self, query: &str) -> Vec<Place> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        if let Some(places) = self.cache().get(query) {
            debug!(query, hits = places.len(), "address cache hit");
            return places;
        }

        let mut request = KeywordQuery::new(query);
        request.size = Some(ADDRESS_RESULT_SIZE);

        match self.online().and_then(|source| source.search_keyword(&request)) {
            Ok(places) if !places.is_empty() => {
                self.cache().put(query, &places);
                return places;
            }
            Ok(_) => debug!(query, "address search returned nothing"),
            Err(PlaceError::Offline) => {}
            Err(e) => warn!(query, error = %e, "address search failed"),
        }

        match hotspots::builtin_lookup(query) {
            Some(spot) => vec![hotspot_place(spot)],
            None => Vec::new(),
        }
    }

    /// Venues of one category around a point, in collaborator order.
    pub fn nearby(&self, center: Coordinate, category: CategoryCode) -> Vec<Place> {
        let request = CategoryQuery {
            category,
            center,
            radius_m: NEARBY_RADIUS_M,
            sort: SortOrder::Accuracy,
        };
        match self.online().and_then(|source| source.search_category(&request)) {
            Ok(places) => places,
            Err(PlaceError::Offline) => Vec::new(),
            Err(e) => {
                warn!(category = %category, error = %e, "nearby search failed");
                Vec::new()
            }
        }
    }

    /// Candidate meeting hubs around a point, nearest first as the collaborator returns them.
    pub fn hubs(&self, center: Coordinate, hub: &HubQuery) -> Vec<Place> {
        let result = self.online().and_then(|source| match *hub {
            HubQuery::Keyword { text, radius_m } => source.search_keyword(&KeywordQuery {
                text: text.to_string(),
                center: Some(center),
                radius_m: Some(radius_m),
                sort: SortOrder::Distance,
                size: Some(HUB_RESULT_SIZE),
                category: None,
            }),
            HubQuery::Category { code, radius_m } => source.search_category(&CategoryQuery {
                category: code,
                center,
                radius_m,
                sort: SortOrder::Distance,
            }),
        });

        match result {
            Ok(places) => places,
            Err(PlaceError::Offline) => Vec::new(),
            Err(e) => {
                warn!(hub = %hub, error = %e, "hub search failed");
                Vec::new()
            }
        }
    }

    /// Human-readable region for a point, if the collaborator can tell.
    pub fn region_label(&self, at: Coordinate) -> Option<String> {
        match self.online().and_then(|source| source.region_name(at)) {
            Ok(name) => Some(name),
            Err(PlaceError::Offline) => None,
            Err(e) => {
                debug!(error = %e, "region lookup failed");
                None
            }
        }
    }
}

fn hotspot_place(spot: &Hotspot) -> Place {
    Place {
        id: String::new(),
        name: spot.name().to_string(),
        address: spot.description.to_string(),
        road_address: None,
        coordinate: spot.coordinate(),
        category: "교통,수송 > 지하철,전철".to_string(),
        category_code: Some(CategoryCode::Subway),
        url: String::new(),
        phone: None,
        distance_m: None,
        source: PlaceSource::Builtin,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{place, ScriptedSearch};
    use super::*;
    use tempfile::TempDir;

    fn resolver_with(source: ScriptedSearch) -> (PlaceResolver, TempDir) {
        let dir = TempDir::new().unwrap();
        let cache = SearchCache::load_from(dir.path().join("cache.json"));
        (PlaceResolver::new(Box::new(source), cache), dir)
    }

    #[test]
    fn test_search_address_online_then_cached() {
        let source = ScriptedSearch::default()
            .keyword(Ok(vec![place("강남역 2호선", "지하철", 37.498, 127.028)]));
        let log = source.call_log();
        let (resolver, _dir) = resolver_with(source);

        let first = resolver.search_address("강남역");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].source, PlaceSource::Kakao);

        // Second call must come from the cache; the script has nothing left.
        let second = resolver.search_address(" 강남역 ");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].source, PlaceSource::Cache);
        assert_eq!(*log.lock().unwrap(), vec!["keyword:강남역".to_string()]);
    }

    #[test]
    fn test_search_address_empty_query() {
        let (resolver, _dir) = resolver_with(ScriptedSearch::default());
        assert!(resolver.search_address("   ").is_empty());
    }

    #[test]
    fn test_search_address_failure_falls_back_to_builtin() {
        let source = ScriptedSearch::default().keyword(Err(PlaceError::Status {
            status: 401,
            message: "unauthorized".into(),
        }));
        let (resolver, _dir) = resolver_with(source);

        let places = resolver.search_address("hongdae");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "홍대입구역");
        assert_eq!(places[0].source, PlaceSource::Builtin);
    }

    #[test]
    fn test_search_address_offline_builtin() {
        let (mut resolver, _dir) = resolver_with(ScriptedSearch::default());
        resolver.set_offline(true);

        let places = resolver.search_address("잠실");
        assert_eq!(places[0].name, "잠실역");
        assert!(resolver.search_address("xyznonexistent").is_empty());
    }

    #[test]
    fn test_offline_skips_network() {
        let source = ScriptedSearch::default().category(Ok(vec![place("a", "", 37.5, 127.0)]));
        let (mut resolver, _dir) = resolver_with(source);
        resolver.set_offline(true);

        assert!(resolver.nearby(Coordinate::new(37.5, 127.0), CategoryCode::Food).is_empty());
        assert!(resolver.region_label(Coordinate::new(37.5, 127.0)).is_none());
    }

    #[test]
    fn test_nearby_failure_is_empty() {
        let source = ScriptedSearch::default().category(Err(PlaceError::Network("timeout".into())));
        let (resolver, _dir) = resolver_with(source);
        assert!(resolver.nearby(Coordinate::new(37.5, 127.0), CategoryCode::Cafe).is_empty());
    }

    #[test]
    fn test_hubs_dispatch() {
        let source = ScriptedSearch::default()
            .keyword(Ok(vec![place("을지로3가역", "지하철", 37.566, 126.991)]))
            .category(Ok(vec![place("시청역", "지하철", 37.565, 126.977)]));
        let (resolver, _dir) = resolver_with(source);
        let center = Coordinate::new(37.56, 126.98);

        let by_keyword = resolver.hubs(center, &HubQuery::Keyword { text: "지하철역", radius_m: 2000 });
        let by_category = resolver.hubs(center, &HubQuery::Category { code: CategoryCode::Subway, radius_m: 5000 });
        assert_eq!(by_keyword[0].name, "을지로3가역");
        assert_eq!(by_category[0].name, "시청역");
    }

    #[test]
    fn test_region_label() {
        let source = ScriptedSearch::default().region("서울특별시 중구 명동");
        let (resolver, _dir) = resolver_with(source);
        assert_eq!(
            resolver.region_label(Coordinate::new(37.56, 126.98)).as_deref(),
            Some("서울특별시 중구 명동")
        );

        let (failing, _dir2) = resolver_with(ScriptedSearch::default());
        assert!(failing.region_label(Coordinate::new(37.56, 126.98)).is_none());
    }
}
