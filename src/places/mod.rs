//! Place-search subsystem for MIDMEET.
//!
//! Wraps the Kakao Local API behind the [`PlaceSearch`] trait, validates its
//! documents at the boundary, caches address lookups on disk, and falls back
//! to the built-in hotspot catalog when the network is unavailable.

pub mod cache;
pub mod kakao;
pub mod resolver;
pub mod types;

pub use cache::SearchCache;
pub use kakao::KakaoClient;
pub use resolver::PlaceResolver;
pub use types::{
    CategoryCode, CategoryQuery, HubQuery, KeywordQuery, Place, PlaceError, PlaceSearch,
    PlaceSource, SortOrder,
};
