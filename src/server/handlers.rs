use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::geo::Coordinate;
use crate::hotspots::{hotspot_list, HotspotInfo};
use crate::places::{Place, PlaceResolver};
use crate::recommend::{RecommendError, Recommendation, Recommender, Strategy};
use crate::session::Session;
use crate::venues::{venues_around, NearbyVenues};
use crate::vibe::Vibe;

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<RecommendError> for ApiError {
    fn from(e: RecommendError) -> Self {
        let status = match e {
            RecommendError::Unresolved(_) | RecommendError::TooFewParticipants(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            RecommendError::NoSuchParticipant(_) | RecommendError::InvalidCoordinate(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        api_error(status, e.to_string())
    }
}

/// Run blocking place-search work off the async runtime with the shared resolver.
async fn with_resolver<T, F>(state: &Arc<AppState>, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&PlaceResolver) -> T + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || work(&state.resolver))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("worker failed: {}", e)))
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── GET /api/search ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

pub(super) async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Place>>, ApiError> {
    let start = Instant::now();

    let query = params.query.unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'query' parameter"));
    }

    let q = query.clone();
    let places = with_resolver(&state, move |resolver| resolver.search_address(&q)).await?;

    info!(
        query = %query,
        results = places.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/search"
    );
    Ok(Json(places))
}

// ─── POST /api/recommend ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ParticipantInput {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub participants: Vec<ParticipantInput>,
    pub strategy: Option<String>,
    pub vibe: Option<String>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub vibe: Vibe,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn session_from_request(req: RecommendRequest) -> Result<Session, ApiError> {
    let strategy = parse_or_default::<Strategy>(req.strategy.as_deref())?;
    let vibe = parse_or_default::<Vibe>(req.vibe.as_deref())?;

    let mut session = Session::new(req.participants.len())
        .with_strategy(strategy)
        .with_vibe(vibe);

    for (index, p) in req.participants.into_iter().enumerate() {
        if let (Some(lat), Some(lon)) = (p.lat, p.lon) {
            session.set_location(index, p.name, Coordinate::new(lat, lon))?;
        }
    }
    Ok(session)
}

pub(super) async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let start = Instant::now();

    let session = session_from_request(req)?;
    let vibe = session.vibe;
    let strategy = session.strategy;
    let count = session.len();

    let recommendation = with_resolver(&state, move |resolver| {
        Recommender::default().recommend(&session, resolver)
    })
    .await??;

    info!(
        strategy = %strategy,
        participants = count,
        candidates = recommendation.candidates.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /api/recommend"
    );

    let message = recommendation
        .is_empty()
        .then(|| "주변에 추천할 장소를 찾을 수 없습니다.".to_string());

    Ok(Json(RecommendResponse { recommendation, vibe, message }))
}

// ─── GET /api/venues ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VenuesQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub vibe: Option<String>,
}

pub(super) async fn venues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VenuesQuery>,
) -> Result<Json<NearbyVenues>, ApiError> {
    let start = Instant::now();

    let center = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
        _ => return Err(api_error(StatusCode::BAD_REQUEST, "Provide 'lat' and 'lon' parameters")),
    };
    if !center.is_valid() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lon: -180..180",
        ));
    }
    let vibe = parse_or_default::<Vibe>(params.vibe.as_deref())?;

    let venues = with_resolver(&state, move |resolver| venues_around(resolver, center, vibe)).await?;

    info!(
        center = %center,
        vibe = %vibe,
        food = venues.food.len(),
        cafe = venues.cafe.len(),
        play = venues.play.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/venues"
    );
    Ok(Json(venues))
}

// ─── GET /api/hotspots ───────────────────────────────────────────

pub async fn hotspots() -> Json<Vec<HotspotInfo>> {
    Json(hotspot_list())
}

// ─── Helpers ─────────────────────────────────────────────────────

fn parse_or_default<T>(raw: Option<&str>) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e)),
        None => Ok(T::default()),
    }
}
