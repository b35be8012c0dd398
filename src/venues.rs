//! What's around a meeting point: food, cafes, and things to do.

use crate::geo::Coordinate;
use crate::places::{CategoryCode, Place, PlaceResolver};
use crate::vibe::{apply_vibe, Vibe};
use serde::Serialize;

/// Venue categories shown around every recommended point, in display order.
pub const VENUE_CATEGORIES: [CategoryCode; 3] =
    [CategoryCode::Food, CategoryCode::Cafe, CategoryCode::Culture];

/// Per-category markers drawn on the map.
pub const MAP_MARKER_LIMIT: usize = 8;
/// Per-category entries in the text list.
pub const LIST_PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct NearbyVenues {
    pub center: Coordinate,
    pub vibe: Vibe,
    pub food: Vec<Place>,
    pub cafe: Vec<Place>,
    pub play: Vec<Place>,
}

impl NearbyVenues {
    pub fn get(&self, category: CategoryCode) -> &[Place] {
        match category {
            CategoryCode::Food => self.food.as_slice(),
            CategoryCode::Cafe => self.cafe.as_slice(),
            CategoryCode::Culture => self.play.as_slice(),
            CategoryCode::Subway => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.food.is_empty() && self.cafe.is_empty() && self.play.is_empty()
    }

    /// Same lists cut to `limit` entries each.
    pub fn truncated(&self, limit: usize) -> NearbyVenues {
        let cut = |v: &[Place]| v.iter().take(limit).cloned().collect::<Vec<_>>();
        NearbyVenues {
            center: self.center,
            vibe: self.vibe,
            food: cut(self.food.as_slice()),
            cafe: cut(self.cafe.as_slice()),
            play: cut(self.play.as_slice()),
        }
    }

    pub fn map_markers(&self) -> NearbyVenues {
        self.truncated(MAP_MARKER_LIMIT)
    }

    pub fn list_preview(&self) -> NearbyVenues {
        self.truncated(LIST_PREVIEW_LIMIT)
    }
}

/// Look up every venue category around `center` and apply the vibe filter.
pub fn venues_around(places: &PlaceResolver, center: Coordinate, vibe: Vibe) -> NearbyVenues {
    let mut lists = VENUE_CATEGORIES
        .iter()
        .map(|&category| apply_vibe(vibe, category, places.nearby(center, category)));

    NearbyVenues {
        center,
        vibe,
        food: lists.next().unwrap_or_default(),
        cafe: lists.next().unwrap_or_default(),
        play: lists.next().unwrap_or_default(),
    }
}

pub fn render_venues(venues: &NearbyVenues) -> String {
    let preview = venues.list_preview();
    let mut out = String::new();
    for (icon, category) in [("🍴", CategoryCode::Food), ("☕", CategoryCode::Cafe), ("🎡", CategoryCode::Culture)] {
        out.push_str(&format!("  {} {}\n", icon, category.label()));
        let list = preview.get(category);
        if list.is_empty() {
            out.push_str("    (없음)\n");
        }
        for p in list {
            out.push_str(&format!("    • {}\n", p.name));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::resolver::testing::{place, ScriptedSearch};
    use crate::places::SearchCache;
    use tempfile::TempDir;

    fn resolver_with(source: ScriptedSearch) -> (PlaceResolver, TempDir) {
        let dir = TempDir::new().unwrap();
        let cache = SearchCache::load_from(dir.path().join("cache.json"));
        (PlaceResolver::new(Box::new(source), cache), dir)
    }

    fn many(prefix: &str, n: usize) -> Vec<Place> {
        (0..n).map(|i| place(&format!("{}{}", prefix, i), "", 37.5, 127.0)).collect()
    }

    #[test]
    fn test_venues_in_category_order() {
        let source = ScriptedSearch::default()
            .category(Ok(many("food", 12)))
            .category(Ok(many("cafe", 3)))
            .category(Ok(vec![]));
        let log = source.call_log();
        let (resolver, _dir) = resolver_with(source);

        let venues = venues_around(&resolver, Coordinate::new(37.5, 127.0), Vibe::Dining);
        assert_eq!(venues.food.len(), 12);
        assert_eq!(venues.cafe.len(), 3);
        assert!(venues.play.is_empty());
        assert_eq!(
            *log.lock().unwrap(),
            vec!["category:FD6".to_string(), "category:CE7".to_string(), "category:CT1".to_string()]
        );

        assert_eq!(venues.map_markers().food.len(), MAP_MARKER_LIMIT);
        assert_eq!(venues.list_preview().food.len(), LIST_PREVIEW_LIMIT);
        assert_eq!(venues.list_preview().cafe.len(), 3);
    }

    #[test]
    fn test_venues_apply_vibe() {
        let food = vec![
            place("분식집", "음식점 > 분식", 37.5, 127.0),
            place("한우마을", "음식점 > 한식 > 육류,고기", 37.5, 127.0),
        ];
        let cafes = vec![
            place("보드게임천국", "음식점 > 카페 > 테마카페", 37.5, 127.0),
            place("북카페", "음식점 > 카페", 37.5, 127.0),
        ];
        let source = ScriptedSearch::default()
            .category(Ok(food.clone()))
            .category(Ok(cafes.clone()))
            .category(Ok(vec![]))
            .category(Ok(food))
            .category(Ok(cafes))
            .category(Ok(vec![]));
        let (resolver, _dir) = resolver_with(source);
        let center = Coordinate::new(37.5, 127.0);

        let drinking = venues_around(&resolver, center, Vibe::Drinking);
        assert_eq!(drinking.food[0].name, "한우마을");
        assert_eq!(drinking.cafe.len(), 2);

        let study = venues_around(&resolver, center, Vibe::Study);
        assert_eq!(study.food[0].name, "분식집");
        assert_eq!(study.cafe.len(), 1);
        assert_eq!(study.cafe[0].name, "북카페");
    }

    #[test]
    fn test_offline_venues_empty() {
        let (mut resolver, _dir) = resolver_with(ScriptedSearch::default());
        resolver.set_offline(true);
        let venues = venues_around(&resolver, Coordinate::new(37.5, 127.0), Vibe::Cafe);
        assert!(venues.is_empty());
        assert!(render_venues(&venues).contains("(없음)"));
    }
}
