use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_circle, draw_line};
use crate::map::projection::Viewport;
use crate::transform::MapPoint;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for coastline data
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    Low,  // built-in outlines - world view
    High, // Natural Earth file - regional
}

impl Lod {
    /// Select LOD based on zoom level
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 4.0 {
            Lod::Low
        } else {
            Lod::High
        }
    }
}

/// Display settings for map layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_labels: true,
        }
    }
}

/// Rendered map layers, one canvas per color plus text labels
/// (char-cell coordinates).
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub markers: BrailleCanvas,
    pub labels: Vec<(u16, u16, String)>,
}

/// Renders the world basemap plus developer location markers.
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            coastlines_low: Vec::new(),
            coastlines_high: Vec::new(),
            settings: DisplaySettings::default(),
        }
    }

    /// Get coastlines for the given LOD, falling back to whatever is loaded
    fn coastlines(&self, lod: Lod) -> &Vec<LineString> {
        match lod {
            Lod::High if !self.coastlines_high.is_empty() => &self.coastlines_high,
            _ => &self.coastlines_low,
        }
    }

    /// Render the basemap and the given developer points into layered
    /// canvases sized `width` x `height` character cells.
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        points: &[MapPoint],
    ) -> MapLayers {
        let mut coastlines = BrailleCanvas::new(width, height);
        let mut markers = BrailleCanvas::new(width, height);
        let mut labels = Vec::new();

        if self.settings.show_coastlines {
            for line in self.coastlines(Lod::from_zoom(viewport.zoom)) {
                draw_linestring(&mut coastlines, line, viewport);
            }
        }

        let radius = if viewport.zoom > 10.0 {
            3
        } else if viewport.zoom > 4.0 {
            2
        } else {
            1
        };

        for point in points {
            let (px, py) = viewport.project(point.longitude, point.latitude);
            if !viewport.is_visible(px, py) {
                continue;
            }
            draw_circle(&mut markers, px, py, radius);

            // Label goes two cells right of the marker
            if self.settings.show_labels && px >= 0 && py >= 0 {
                let char_x = (px / 2) as u16;
                let char_y = (py / 4) as u16;
                if let Some(label_x) = char_x.checked_add(2) {
                    labels.push((label_x, char_y, point.name.clone()));
                }
            }
        }

        MapLayers {
            coastlines,
            markers,
            labels,
        }
    }

    /// Add coastline data at a specific LOD
    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    /// Check if any basemap data is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty() || !self.coastlines_high.is_empty()
    }

    /// Toggle point labels
    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }

    /// Toggle coastlines
    pub fn toggle_coastlines(&mut self) {
        self.settings.show_coastlines = !self.settings.show_coastlines;
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str, lat: f64, lon: f64) -> MapPoint {
        MapPoint {
            name: name.to_string(),
            local: name.to_string(),
            games_count: 1,
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn render_marks_visible_points() {
        let renderer = MapRenderer::new();
        let viewport = Viewport::world(80, 48);
        let layers = renderer.render(40, 12, &viewport, &[point("Tokyo", 35.6, 139.7)]);

        let drawn = layers.markers.rows().any(|row| row.chars().any(|c| c != '\u{2800}'));
        assert!(drawn);
        assert_eq!(layers.labels.len(), 1);
        assert_eq!(layers.labels[0].2, "Tokyo");
    }

    #[test]
    fn labels_respect_toggle() {
        let mut renderer = MapRenderer::new();
        renderer.toggle_labels();
        let viewport = Viewport::world(80, 48);
        let layers = renderer.render(40, 12, &viewport, &[point("Kyoto", 35.0, 135.8)]);
        assert!(layers.labels.is_empty());
    }

    #[test]
    fn high_lod_falls_back_to_low() {
        let mut renderer = MapRenderer::new();
        renderer.add_coastline(vec![(0.0, 0.0), (10.0, 10.0)], Lod::Low);
        assert_eq!(renderer.coastlines(Lod::High).len(), 1);
    }
}
