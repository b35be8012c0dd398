//! Kakao Local REST API provider.
//!
//! Raw documents carry coordinates as strings (`x` = longitude, `y` =
//! latitude); they are validated into [`Place`] here so nothing past this
//! module sees untyped JSON.

use super::types::{
    CategoryCode, CategoryQuery, KeywordQuery, Place, PlaceError, PlaceSearch, PlaceSource,
};
use crate::geo::Coordinate;
use serde::Deserialize;
use std::time::Duration;

pub const KAKAO_API_BASE: &str = "https://dapi.kakao.com";

const USER_AGENT: &str = "MidMeet/0.3 (meeting-point-engine)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const REGION_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Deserialize, Debug)]
struct KakaoResponse<T> {
    #[serde(default = "Vec::new")]
    documents: Vec<T>,
}

/// One place document as returned by the keyword/category endpoints.
#[derive(Deserialize, Debug, Clone)]
pub struct KakaoDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub address_name: String,
    #[serde(default)]
    pub road_address_name: String,
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub place_url: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub category_group_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub distance: String,
}

impl KakaoDocument {
    /// Validate into a [`Place`]. Returns `None` for a nameless document or
    /// when coordinates are missing, don't parse, or fall outside the valid range.
    pub fn into_place(self) -> Option<Place> {
        if self.place_name.trim().is_empty() {
            return None;
        }
        let lat: f64 = self.y.trim().parse().ok()?;
        let lon: f64 = self.x.trim().parse().ok()?;
        let coordinate = Coordinate::new(lat, lon);
        if !coordinate.is_valid() {
            return None;
        }

        Some(Place {
            id: self.id,
            name: self.place_name,
            address: self.address_name,
            road_address: non_empty(self.road_address_name),
            coordinate,
            category: self.category_name,
            category_code: CategoryCode::from_code(&self.category_group_code),
            url: self.place_url,
            phone: non_empty(self.phone),
            distance_m: self.distance.trim().parse().ok(),
            source: PlaceSource::Kakao,
        })
    }
}

#[derive(Deserialize, Debug)]
struct RegionDocument {
    #[serde(default)]
    region_type: String,
    #[serde(default)]
    address_name: String,
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Decode a `{ documents: [...] }` body, dropping documents that fail validation.
pub fn parse_documents(body: &str) -> Result<Vec<Place>, PlaceError> {
    let parsed: KakaoResponse<KakaoDocument> =
        serde_json::from_str(body).map_err(|e| PlaceError::InvalidResponse(e.to_string()))?;
    Ok(parsed.documents.into_iter().filter_map(KakaoDocument::into_place).collect())
}

/// Blocking Kakao Local client.
pub struct KakaoClient {
    agent: ureq::Agent,
    api_key: Option<String>,
    base_url: String,
}

impl KakaoClient {
    pub fn new(api_key: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            api_key: api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()),
            base_url: KAKAO_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn request(&self, path: &str) -> Result<ureq::Request, PlaceError> {
        let key = self.api_key.as_deref().ok_or(PlaceError::MissingApiKey)?;
        Ok(self
            .agent
            .get(&format!("{}{}", self.base_url, path))
            .set("Authorization", &format!("KakaoAK {}", key)))
    }

    fn fetch_places(&self, request: ureq::Request) -> Result<Vec<Place>, PlaceError> {
        let body = call(request)?
            .into_string()
            .map_err(|e| PlaceError::InvalidResponse(e.to_string()))?;
        parse_documents(&body)
    }
}

fn call(request: ureq::Request) -> Result<ureq::Response, PlaceError> {
    match request.call() {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => Err(PlaceError::Status {
            status,
            message: response.into_string().unwrap_or_default(),
        }),
        Err(ureq::Error::Transport(e)) => Err(PlaceError::Network(e.to_string())),
    }
}

fn with_center(request: ureq::Request, center: Coordinate) -> ureq::Request {
    request
        .query("x", &center.lon.to_string())
        .query("y", &center.lat.to_string())
}

impl PlaceSearch for KakaoClient {
    fn search_keyword(&self, query: &KeywordQuery) -> Result<Vec<Place>, PlaceError> {
        let mut request = self
            .request("/v2/local/search/keyword.json")?
            .query("query", query.text.trim())
            .query("sort", query.sort.as_str());

        if let Some(center) = query.center {
            request = with_center(request, center);
        }
        if let Some(radius) = query.radius_m {
            request = request.query("radius", &radius.min(20_000).to_string());
        }
        if let Some(size) = query.size {
            request = request.query("size", &size.clamp(1, 15).to_string());
        }
        if let Some(category) = query.category {
            request = request.query("category_group_code", category.code());
        }

        self.fetch_places(request)
    }

    fn search_category(&self, query: &CategoryQuery) -> Result<Vec<Place>, PlaceError> {
        let request = self
            .request("/v2/local/search/category.json")?
            .query("category_group_code", query.category.code())
            .query("radius", &query.radius_m.min(20_000).to_string())
            .query("sort", query.sort.as_str());

        self.fetch_places(with_center(request, query.center))
    }

    fn region_name(&self, at: Coordinate) -> Result<String, PlaceError> {
        let request = with_center(self.request("/v2/local/geo/coord2regioncode.json")?, at)
            .timeout(REGION_TIMEOUT);

        let parsed: KakaoResponse<RegionDocument> = call(request)?
            .into_json()
            .map_err(|e| PlaceError::InvalidResponse(e.to_string()))?;

        // "H" is the administrative dong; "B" the legal one.
        parsed
            .documents
            .iter()
            .find(|d| d.region_type == "H" && !d.address_name.is_empty())
            .or_else(|| parsed.documents.iter().find(|d| !d.address_name.is_empty()))
            .map(|d| d.address_name.clone())
            .ok_or_else(|| PlaceError::InvalidResponse("no region documents".into()))
    }
}
