use crate::fetch::{sources, FetchMode, Source, SourceUpdate};
use crate::map::{MapRenderer, Viewport};
use crate::transform::{GenreCount, MapPoint, PlatformExclusives, RankedEntry};
use ratatui::layout::Rect;

/// Lifecycle of one upstream source, shown in the status bar.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceState {
    Loading,
    Loaded,
    Failed(String),
}

/// Last-known chart data, one slot per visualization. Slots are
/// replaced wholesale when their source completes; an empty slot
/// renders as an empty panel.
#[derive(Default)]
pub struct Dashboard {
    pub genres: Vec<GenreCount>,
    pub top_games: Vec<RankedEntry>,
    pub top_creators: Vec<RankedEntry>,
    pub platforms: Vec<PlatformExclusives>,
    pub developers: Vec<MapPoint>,
}

/// Application state
pub struct App {
    pub mode: FetchMode,
    pub dashboard: Dashboard,
    pub statuses: Vec<(Source, SourceState)>,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub should_quit: bool,
    /// Inner rect of the map panel, set during rendering; mouse events
    /// outside it are ignored.
    pub map_area: Rect,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
}

impl App {
    pub fn new(mode: FetchMode) -> Self {
        Self {
            mode,
            dashboard: Dashboard::default(),
            statuses: Vec::new(),
            viewport: Viewport::world(2, 4),
            map_renderer: MapRenderer::new(),
            should_quit: false,
            map_area: Rect::default(),
            last_mouse: None,
        }
    }

    /// Reset every source to Loading; called right before fetches are
    /// (re-)issued.
    pub fn begin_loading(&mut self) {
        self.statuses = sources(self.mode)
            .iter()
            .map(|&source| (source, SourceState::Loading))
            .collect();
    }

    /// Apply one completed fetch to its dashboard slot.
    pub fn apply(&mut self, update: SourceUpdate) {
        match update {
            SourceUpdate::Genres(genres) => {
                self.dashboard.genres = genres;
                self.mark(self.chart_source(), SourceState::Loaded);
            }
            SourceUpdate::TopGames(games) => {
                self.dashboard.top_games = games;
                self.mark(self.chart_source(), SourceState::Loaded);
            }
            SourceUpdate::TopCreators(creators) => {
                self.dashboard.top_creators = creators;
                self.mark(self.creators_source(), SourceState::Loaded);
            }
            SourceUpdate::Platforms(platforms) => {
                self.dashboard.platforms = platforms;
                self.mark(self.platforms_source(), SourceState::Loaded);
            }
            SourceUpdate::Developers(points) => {
                self.dashboard.developers = points;
                self.mark(Source::Geocache, SourceState::Loaded);
            }
            SourceUpdate::Failed { source, error } => {
                self.mark(source, SourceState::Failed(error));
            }
        }
    }

    fn chart_source(&self) -> Source {
        match self.mode {
            FetchMode::Legacy => Source::Games,
            FetchMode::Aggregated => Source::Dashboard,
        }
    }

    fn creators_source(&self) -> Source {
        match self.mode {
            FetchMode::Legacy => Source::Creators,
            FetchMode::Aggregated => Source::Dashboard,
        }
    }

    fn platforms_source(&self) -> Source {
        match self.mode {
            FetchMode::Legacy => Source::Platforms,
            FetchMode::Aggregated => Source::Dashboard,
        }
    }

    fn mark(&mut self, source: Source, state: SourceState) {
        if let Some(entry) = self.statuses.iter_mut().find(|(s, _)| *s == source) {
            entry.1 = state;
        }
    }

    /// First failure message, for the status bar.
    pub fn first_error(&self) -> Option<&str> {
        self.statuses.iter().find_map(|(_, state)| match state {
            SourceState::Failed(message) => Some(message.as_str()),
            _ => None,
        })
    }

    /// Pan the map
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    /// Zoom in
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    /// Zoom out
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Translate a terminal cell inside the map panel to braille pixel
    /// coordinates. Each cell is 2 pixels wide and 4 tall.
    fn map_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let area = self.map_area;
        if col < area.x || col >= area.x + area.width || row < area.y || row >= area.y + area.height
        {
            return None;
        }
        let px = ((col - area.x) as i32) * 2;
        let py = ((row - area.y) as i32) * 4;
        Some((px, py))
    }

    /// Zoom towards a terminal position (scroll wheel)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom away from a terminal position (scroll wheel)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Handle mouse drag over the map panel
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            // Less sensitive when zoomed out
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            self.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_fill_their_own_slots() {
        let mut app = App::new(FetchMode::Aggregated);
        app.begin_loading();
        assert_eq!(app.statuses.len(), 2);

        app.apply(SourceUpdate::Genres(vec![GenreCount {
            genre: "RPG".into(),
            count: 2,
        }]));
        assert_eq!(app.dashboard.genres.len(), 1);
        assert!(app.dashboard.top_games.is_empty());
        assert_eq!(app.statuses[0].1, SourceState::Loaded);
        assert_eq!(app.statuses[1].1, SourceState::Loading);
    }

    #[test]
    fn one_failure_leaves_other_sources_alone() {
        let mut app = App::new(FetchMode::Legacy);
        app.begin_loading();

        app.apply(SourceUpdate::TopCreators(vec![RankedEntry {
            name: "Kojima".into(),
            rating: 9.8,
        }]));
        app.apply(SourceUpdate::Failed {
            source: Source::Games,
            error: "connection refused".into(),
        });

        assert_eq!(app.dashboard.top_creators.len(), 1);
        assert_eq!(app.first_error(), Some("connection refused"));
        let games_state = &app.statuses.iter().find(|(s, _)| *s == Source::Games).unwrap().1;
        assert!(matches!(games_state, SourceState::Failed(_)));
    }

    #[test]
    fn refresh_resets_statuses_to_loading() {
        let mut app = App::new(FetchMode::Legacy);
        app.begin_loading();
        app.apply(SourceUpdate::Failed {
            source: Source::Platforms,
            error: "timeout".into(),
        });
        app.begin_loading();
        assert!(app.statuses.iter().all(|(_, s)| *s == SourceState::Loading));
    }

    #[test]
    fn mouse_outside_map_panel_is_ignored() {
        let mut app = App::new(FetchMode::Aggregated);
        app.map_area = Rect::new(10, 5, 40, 20);
        let zoom = app.viewport.zoom;
        app.zoom_in_at(0, 0);
        assert_eq!(app.viewport.zoom, zoom);
    }
}
