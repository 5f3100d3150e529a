use crate::app::{App, SourceState};
use crate::map::MapLayers;
use crate::transform::RankedEntry;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Widget},
    Frame,
};

/// Render the dashboard: two chart rows, the map, and a status bar.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(28), // Genre + top games charts
            Constraint::Percentage(28), // Creators + platforms
            Constraint::Min(8),         // Map
            Constraint::Length(1),      // Status bar
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_genres(frame, app, top[0]);
    render_top_games(frame, app, top[1]);
    render_creators(frame, app, middle[0]);
    render_platforms(frame, app, middle[1]);
    render_map(frame, app, rows[2]);
    render_status_bar(frame, app, rows[3]);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn render_genres(frame: &mut Frame, app: &App, area: Rect) {
    let bars: Vec<Bar> = app
        .dashboard
        .genres
        .iter()
        .map(|g| {
            Bar::default()
                .value(g.count)
                .label(Line::from(g.genre.clone()))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Games by Genre"))
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

/// Bar charts take integer values; ratings are fractional, so bars are
/// scaled x10 and the printed value keeps one decimal.
fn rating_bars(entries: &[RankedEntry]) -> Vec<Bar<'_>> {
    entries
        .iter()
        .map(|e| {
            Bar::default()
                .value((e.rating * 10.0).round() as u64)
                .text_value(format!("{:.1}", e.rating))
                .label(Line::from(e.name.clone()))
        })
        .collect()
}

fn render_top_games(frame: &mut Frame, app: &App, area: Rect) {
    let bars = rating_bars(&app.dashboard.top_games);
    let chart = BarChart::default()
        .block(panel("Top Rated Games"))
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_creators(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .dashboard
        .top_creators
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Row::new(vec![
                Cell::from(format!("{}.", i + 1)),
                Cell::from(c.name.clone()),
                Cell::from(format!("{:.1}", c.rating)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(vec!["#", "Creator", "Rating"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(panel("Top Rated Creators"));
    frame.render_widget(table, area);
}

fn render_platforms(frame: &mut Frame, app: &App, area: Rect) {
    let bars: Vec<Bar> = app
        .dashboard
        .platforms
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.exclusives)
                .label(Line::from(p.name.clone()))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Platform Exclusives"))
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::Black).bg(Color::Blue))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_map(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = panel("Developer Locations");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Mouse handling and zoom math need the panel geometry
    app.map_area = inner;
    app.viewport.width = inner.width as usize * 2;
    app.viewport.height = inner.height as usize * 4;

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &app.viewport,
        &app.dashboard.developers,
    );

    frame.render_widget(
        MapWidget {
            layers,
            inner_width: inner.width,
            inner_height: inner.height,
        },
        inner,
    );
}

/// Braille map with developer markers and text labels overlaid
struct MapWidget {
    layers: MapLayers,
    inner_width: u16,
    inner_height: u16,
}

impl MapWidget {
    fn render_layer(
        &self,
        canvas: &crate::braille::BrailleCanvas,
        color: Color,
        area: Rect,
        buf: &mut Buffer,
    ) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_layer(&self.layers.coastlines, Color::Cyan, area, buf);
        self.render_layer(&self.layers.markers, Color::Yellow, area, buf);

        let label_style = Style::default().fg(Color::White);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= self.inner_height || *lx >= self.inner_width {
                continue;
            }

            let y = area.y + *ly;
            let max_len = (self.inner_width.saturating_sub(*lx)) as usize;
            let display_text: String = text.chars().take(max_len.min(24)).collect();

            for (i, ch) in display_text.chars().enumerate() {
                let px = area.x + *lx + i as u16;
                if px < area.x + area.width {
                    buf[(px, y)].set_char(ch).set_style(label_style);
                }
            }
        }
    }
}

fn source_span(source: &str, state: &SourceState) -> Vec<Span<'static>> {
    let (mark, color) = match state {
        SourceState::Loading => ("…", Color::DarkGray),
        SourceState::Loaded => ("✓", Color::Green),
        SourceState::Failed(_) => ("✗", Color::Red),
    };
    vec![
        Span::styled(format!("{source}"), Style::default().fg(color)),
        Span::styled(format!("{mark} "), Style::default().fg(color)),
    ]
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (source, state) in &app.statuses {
        spans.extend(source_span(&source.to_string(), state));
    }

    spans.extend([
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" ", Style::default()),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | hjkl:pan +/-:zoom L:labels r:refresh q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    if let Some(error) = app.first_error() {
        let short: String = error.chars().take(60).collect();
        spans.push(Span::styled(
            format!(" | {short}"),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
