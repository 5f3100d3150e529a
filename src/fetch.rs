//! Fire-and-forget source loading.
//!
//! Each upstream request runs on its own thread and reports back over
//! one mpsc channel. Sources are independent: they may complete in any
//! order, and one failing never blocks the others. In-flight requests
//! are not cancelled on quit; the threads die with the process.

use crate::api::ApiClient;
use crate::transform::{
    developer_points, games_by_genre, platform_exclusives, top_rated, GenreCount, MapPoint,
    PlatformExclusives, RankedEntry,
};
use std::fmt;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{info, warn};

/// Both call sites of the top-N ranker use the same cutoff.
pub const TOP_N: usize = 5;

/// Which upstream contract to speak.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchMode {
    /// Raw `/games`, `/creators`, `/platforms`; aggregation runs here.
    Legacy,
    /// Pre-aggregated `/consultas_complexas/*`; only the geocache still
    /// needs flattening (that transform is never server-side).
    Aggregated,
}

/// One upstream data source, used for status display and error tagging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    Games,
    Creators,
    Platforms,
    Dashboard,
    Geocache,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Games => "games",
            Source::Creators => "creators",
            Source::Platforms => "platforms",
            Source::Dashboard => "dashboard",
            Source::Geocache => "geocache",
        };
        f.write_str(name)
    }
}

/// A completed fetch, already transformed into its chart-ready shape.
/// Each variant writes exactly one dashboard slot.
pub enum SourceUpdate {
    Genres(Vec<GenreCount>),
    TopGames(Vec<RankedEntry>),
    TopCreators(Vec<RankedEntry>),
    Platforms(Vec<PlatformExclusives>),
    Developers(Vec<MapPoint>),
    Failed { source: Source, error: String },
}

/// Sources that will report on the channel for the given mode. The
/// status bar tracks exactly this set.
pub fn sources(mode: FetchMode) -> &'static [Source] {
    match mode {
        FetchMode::Legacy => &[Source::Games, Source::Creators, Source::Platforms],
        FetchMode::Aggregated => &[Source::Dashboard, Source::Geocache],
    }
}

/// Issue every fetch for the given mode. Returns immediately; results
/// arrive on `tx` as the threads finish.
pub fn spawn_all(client: &ApiClient, mode: FetchMode, tx: &Sender<SourceUpdate>) {
    match mode {
        FetchMode::Legacy => {
            spawn(client, tx, Source::Games, |client, tx| {
                let games = client.games()?;
                info!(count = games.len(), "loaded game records");
                let _ = tx.send(SourceUpdate::Genres(games_by_genre(&games)));
                let _ = tx.send(SourceUpdate::TopGames(top_rated(&games, TOP_N)));
                Ok(())
            });
            spawn(client, tx, Source::Creators, |client, tx| {
                let creators = client.creators()?;
                info!(count = creators.len(), "loaded creator records");
                let _ = tx.send(SourceUpdate::TopCreators(top_rated(&creators, TOP_N)));
                Ok(())
            });
            spawn(client, tx, Source::Platforms, |client, tx| {
                let platforms = client.platforms()?;
                let _ = tx.send(SourceUpdate::Platforms(platform_exclusives(&platforms)));
                Ok(())
            });
        }
        FetchMode::Aggregated => {
            spawn(client, tx, Source::Dashboard, |client, tx| {
                let payload = client.dashboard()?;
                let _ = tx.send(SourceUpdate::Genres(payload.games_by_genre));
                let _ = tx.send(SourceUpdate::TopGames(payload.top_rated_games));
                let _ = tx.send(SourceUpdate::TopCreators(payload.creators));
                let _ = tx.send(SourceUpdate::Platforms(payload.platforms));
                Ok(())
            });
            spawn(client, tx, Source::Geocache, |client, tx| {
                let geocache = client.geocache()?;
                let points = developer_points(&geocache);
                info!(
                    total = geocache.len(),
                    located = points.len(),
                    "flattened geocache"
                );
                let _ = tx.send(SourceUpdate::Developers(points));
                Ok(())
            });
        }
    }
}

fn spawn<F>(client: &ApiClient, tx: &Sender<SourceUpdate>, source: Source, job: F)
where
    F: FnOnce(&ApiClient, &Sender<SourceUpdate>) -> anyhow::Result<()> + Send + 'static,
{
    let client = client.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        if let Err(error) = job(&client, &tx) {
            warn!(%source, %error, "fetch failed");
            let _ = tx.send(SourceUpdate::Failed {
                source,
                error: error.to_string(),
            });
        }
    });
}
