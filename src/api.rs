//! Catalog API schema types and HTTP client.
//!
//! Two upstream contracts coexist and both are supported:
//! the legacy raw-collection endpoints (`/games`, `/creators`,
//! `/platforms`), where all aggregation happens client-side, and the
//! pre-aggregated `/consultas_complexas/*` endpoints, where the server
//! ships chart-ready rows and only the geocache still needs flattening.
//!
//! Required fields are non-`Option` on purpose: a response missing
//! `rating` is a decode error, not a silent default.

use crate::transform::{GenreCount, PlatformExclusives, RankedEntry, Rated};
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// One game as served by `GET /games`.
#[derive(Clone, Debug, Deserialize)]
pub struct GameRecord {
    pub name: String,
    pub rating: f64,
    pub genres: Vec<String>,
}

/// One creator as served by `GET /creators`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreatorRecord {
    pub name: String,
    pub rating: f64,
}

/// One platform as served by `GET /platforms`.
#[derive(Clone, Debug, Deserialize)]
pub struct PlatformRecord {
    pub name: String,
    pub exclusive_count: u64,
}

impl Rated for GameRecord {
    fn name(&self) -> &str {
        &self.name
    }
    fn rating(&self) -> f64 {
        self.rating
    }
}

impl Rated for CreatorRecord {
    fn name(&self) -> &str {
        &self.name
    }
    fn rating(&self) -> f64 {
        self.rating
    }
}

/// Server-aggregated dashboard body from
/// `GET /consultas_complexas/dashboard`. Already chart-shaped; the
/// client passes it straight through.
#[derive(Clone, Debug, Deserialize)]
pub struct DashboardPayload {
    #[serde(rename = "gamesByGenre")]
    pub games_by_genre: Vec<GenreCount>,
    #[serde(rename = "topRatedGames")]
    pub top_rated_games: Vec<RankedEntry>,
    pub creators: Vec<RankedEntry>,
    pub platforms: Vec<PlatformExclusives>,
}

/// Place name → `[latitude, longitude]`, either possibly null.
/// IndexMap keeps the server's arrival order, which the map legend
/// relies on.
pub type Geocache = IndexMap<String, (Option<f64>, Option<f64>)>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking client for the catalog API. Cheap to clone; one clone per
/// fetch thread.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("catalog-dash/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(
                "{url} returned {status}: {}",
                body.chars().take(200).collect::<String>()
            ));
        }

        response
            .json()
            .with_context(|| format!("failed to decode response from {url}"))
    }

    pub fn games(&self) -> Result<Vec<GameRecord>> {
        self.get_json("/games")
    }

    pub fn creators(&self) -> Result<Vec<CreatorRecord>> {
        self.get_json("/creators")
    }

    pub fn platforms(&self) -> Result<Vec<PlatformRecord>> {
        self.get_json("/platforms")
    }

    pub fn dashboard(&self) -> Result<DashboardPayload> {
        self.get_json("/consultas_complexas/dashboard")
    }

    pub fn geocache(&self) -> Result<Geocache> {
        self.get_json("/consultas_complexas/geocache")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_record_decodes() {
        let game: GameRecord =
            serde_json::from_str(r#"{"name":"A","rating":9.5,"genres":["RPG"]}"#).unwrap();
        assert_eq!(game.name, "A");
        assert_eq!(game.rating, 9.5);
        assert_eq!(game.genres, ["RPG"]);
    }

    #[test]
    fn missing_rating_is_a_decode_failure() {
        let result: Result<GameRecord, _> =
            serde_json::from_str(r#"{"name":"A","genres":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn dashboard_payload_uses_camel_case_keys() {
        let payload: DashboardPayload = serde_json::from_str(
            r#"{
                "gamesByGenre": [{"genre": "RPG", "count": 3}],
                "topRatedGames": [{"name": "A", "rating": 9.0}],
                "creators": [],
                "platforms": [{"name": "PC", "exclusives": 4}]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.games_by_genre[0].genre, "RPG");
        assert_eq!(payload.top_rated_games[0].rating, 9.0);
        assert!(payload.creators.is_empty());
        assert_eq!(payload.platforms[0].exclusives, 4);
    }

    #[test]
    fn geocache_decodes_nulls_and_keeps_order() {
        let geocache: Geocache = serde_json::from_str(
            r#"{
                "Tokyo": [35.6, 139.7],
                "Unknown": [null, null],
                "Austin": [30.3, -97.7]
            }"#,
        )
        .unwrap();
        let keys: Vec<&String> = geocache.keys().collect();
        assert_eq!(keys, ["Tokyo", "Unknown", "Austin"]);
        assert_eq!(geocache["Tokyo"], (Some(35.6), Some(139.7)));
        assert_eq!(geocache["Unknown"], (None, None));
    }
}
