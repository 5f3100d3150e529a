use crate::api::{GameRecord, Geocache, PlatformRecord};
use indexmap::IndexMap;
use serde::Deserialize;

/// One bar of the games-per-genre chart.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u64,
}

/// One entry of a top-N-by-rating list (games or creators).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub rating: f64,
}

/// A platform reduced to its exclusive-title count.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlatformExclusives {
    pub name: String,
    pub exclusives: u64,
}

/// A developer location plotted on the world map.
///
/// `local` always mirrors `name` and `games_count` is always 1; both
/// quirks come from the upstream geocache contract and are preserved
/// rather than corrected.
#[derive(Clone, Debug, PartialEq)]
pub struct MapPoint {
    pub name: String,
    pub local: String,
    pub games_count: u64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Anything rankable by `top_rated`: games and creators both qualify.
pub trait Rated {
    fn name(&self) -> &str;
    fn rating(&self) -> f64;
}

/// Count games per genre, in first-seen genre order.
///
/// Counting is per occurrence in each record's genre list; upstream
/// genre lists are assumed to be de-duplicated per game, so in practice
/// this equals "number of games listing the genre".
pub fn games_by_genre(games: &[GameRecord]) -> Vec<GenreCount> {
    let mut counts: IndexMap<&str, u64> = IndexMap::new();
    for game in games {
        for genre in &game.genres {
            *counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect()
}

/// The `min(n, len)` highest-rated entries, rating descending.
///
/// Sort is stable: equal ratings keep their original input order.
pub fn top_rated<T: Rated>(items: &[T], n: usize) -> Vec<RankedEntry> {
    let mut order: Vec<&T> = items.iter().collect();
    order.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
    order
        .into_iter()
        .take(n)
        .map(|item| RankedEntry {
            name: item.name().to_string(),
            rating: item.rating(),
        })
        .collect()
}

/// Rename-only projection: same length, same order.
pub fn platform_exclusives(platforms: &[PlatformRecord]) -> Vec<PlatformExclusives> {
    platforms
        .iter()
        .map(|p| PlatformExclusives {
            name: p.name.clone(),
            exclusives: p.exclusive_count,
        })
        .collect()
}

/// Flatten the geocache mapping into plottable points, in insertion
/// order, skipping any entry whose latitude or longitude is null.
///
/// A half-null pair is not expected upstream; if one shows up it is
/// excluded like a fully null one rather than treated as an error.
pub fn developer_points(geocache: &Geocache) -> Vec<MapPoint> {
    geocache
        .iter()
        .filter_map(|(name, &(lat, lon))| {
            let (latitude, longitude) = (lat?, lon?);
            Some(MapPoint {
                name: name.clone(),
                local: name.clone(),
                games_count: 1,
                latitude,
                longitude,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn game(name: &str, rating: f64, genres: &[&str]) -> GameRecord {
        GameRecord {
            name: name.to_string(),
            rating,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn genre_counts_follow_discovery_order() {
        let games = [
            game("A", 9.0, &["RPG"]),
            game("B", 7.0, &["RPG", "Action"]),
            game("C", 5.0, &["Action", "Puzzle"]),
        ];
        let counts = games_by_genre(&games);
        assert_eq!(
            counts,
            vec![
                GenreCount { genre: "RPG".into(), count: 2 },
                GenreCount { genre: "Action".into(), count: 2 },
                GenreCount { genre: "Puzzle".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn genre_counting_is_per_occurrence() {
        // Upstream genre lists are assumed de-duplicated per game; a
        // duplicated entry therefore counts twice by contract.
        let games = [game("A", 8.0, &["RPG", "RPG"])];
        let counts = games_by_genre(&games);
        assert_eq!(counts, vec![GenreCount { genre: "RPG".into(), count: 2 }]);
    }

    #[test]
    fn genre_aggregator_empty_input() {
        assert!(games_by_genre(&[]).is_empty());
        assert!(games_by_genre(&[game("A", 1.0, &[])]).is_empty());
    }

    #[test]
    fn top_rated_truncates_to_input_length() {
        let games = [
            game("A", 3.0, &[]),
            game("B", 1.0, &[]),
            game("C", 2.0, &[]),
        ];
        let top = top_rated(&games, 5);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].name, "A");
        assert_eq!(top[1].name, "C");
        assert_eq!(top[2].name, "B");
    }

    #[test]
    fn top_rated_picks_five_highest_descending() {
        let games: Vec<GameRecord> = (0..10)
            .map(|i| game(&format!("g{i}"), i as f64, &[]))
            .collect();
        let top = top_rated(&games, 5);
        let names: Vec<&str> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["g9", "g8", "g7", "g6", "g5"]);
        assert!(top.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn top_rated_ties_keep_input_order() {
        let games = [
            game("first", 7.0, &[]),
            game("second", 7.0, &[]),
            game("best", 9.0, &[]),
        ];
        let top = top_rated(&games, 5);
        assert_eq!(top[0].name, "best");
        assert_eq!(top[1].name, "first");
        assert_eq!(top[2].name, "second");
    }

    #[test]
    fn platform_projection_preserves_length_and_order() {
        let platforms = vec![
            PlatformRecord { name: "Switch".into(), exclusive_count: 12 },
            PlatformRecord { name: "PS5".into(), exclusive_count: 7 },
            PlatformRecord { name: "PC".into(), exclusive_count: 0 },
        ];
        let projected = platform_exclusives(&platforms);
        assert_eq!(projected.len(), platforms.len());
        for (out, input) in projected.iter().zip(&platforms) {
            assert_eq!(out.name, input.name);
            assert_eq!(out.exclusives, input.exclusive_count);
        }
    }

    #[test]
    fn geocache_keeps_located_entries_only() {
        let mut geocache: Geocache = IndexMap::new();
        geocache.insert("Tokyo".into(), (Some(35.6), Some(139.7)));
        geocache.insert("Unknown".into(), (None, None));
        geocache.insert("HalfNull".into(), (Some(1.0), None));

        let points = developer_points(&geocache);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "Tokyo");
        assert_eq!(points[0].local, "Tokyo");
        assert_eq!(points[0].games_count, 1);
        assert_eq!(points[0].latitude, 35.6);
        assert_eq!(points[0].longitude, 139.7);
    }

    #[test]
    fn geocache_output_follows_insertion_order() {
        let mut geocache: Geocache = IndexMap::new();
        geocache.insert("Kyoto".into(), (Some(35.0), Some(135.8)));
        geocache.insert("Gone".into(), (None, None));
        geocache.insert("Austin".into(), (Some(30.3), Some(-97.7)));

        let names: Vec<String> = developer_points(&geocache)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Kyoto", "Austin"]);
    }

    #[test]
    fn dashboard_scenario_end_to_end() {
        let games = [
            game("A", 9.0, &["RPG"]),
            game("B", 7.0, &["RPG", "Action"]),
        ];

        let counts = games_by_genre(&games);
        assert_eq!(
            counts,
            vec![
                GenreCount { genre: "RPG".into(), count: 2 },
                GenreCount { genre: "Action".into(), count: 1 },
            ]
        );

        let top = top_rated(&games, 5);
        assert_eq!(
            top,
            vec![
                RankedEntry { name: "A".into(), rating: 9.0 },
                RankedEntry { name: "B".into(), rating: 7.0 },
            ]
        );
    }
}
