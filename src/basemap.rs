//! World basemap loading: Natural Earth coastline GeoJSON when a data
//! directory is available, built-in simplified outlines otherwise. The
//! map panel is never blank.

use crate::map::{Lod, MapRenderer};
use anyhow::Result;
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Load whatever coastline files exist under `data_dir` into the
/// renderer. Missing files are skipped; unparsable ones are logged and
/// skipped.
pub fn load_coastlines(renderer: &mut MapRenderer, data_dir: &Path) {
    let coastline_files = [
        ("ne_110m_coastline.json", Lod::Low),
        ("ne_50m_coastline.json", Lod::High),
        ("ne_10m_coastline.json", Lod::High),
    ];

    for (filename, lod) in coastline_files {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        if let Err(error) = load_file(renderer, &path, lod) {
            warn!(file = filename, %error, "failed to load coastline file");
        }
    }
}

fn load_file(renderer: &mut MapRenderer, path: &Path, lod: Lod) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    collect_lines(&geojson, &mut |line| renderer.add_coastline(line, lod));
    Ok(())
}

/// Walk a GeoJSON document and hand every line (or polygon exterior)
/// to `add_line` as a lon/lat sequence.
fn collect_lines<F>(geojson: &GeoJson, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_geometry(geometry, add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_geometry(geometry, add_line);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry(geometry, add_line),
    }
}

fn collect_geometry<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    let to_line = |coords: &Vec<Vec<f64>>| coords.iter().map(|c| (c[0], c[1])).collect();

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(to_line(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry(g, add_line);
            }
        }
        _ => {}
    }
}

/// Coarse continent outlines used when no coastline file is present.
pub fn builtin_world(renderer: &mut MapRenderer) {
    // North America
    renderer.add_coastline(
        vec![
            (-166.0, 62.0), (-140.0, 60.0), (-125.0, 48.0), (-117.0, 32.0),
            (-97.0, 26.0), (-81.0, 25.0), (-75.0, 35.0), (-66.0, 45.0),
            (-53.0, 47.0), (-58.0, 55.0), (-78.0, 62.0), (-95.0, 62.0),
            (-125.0, 70.0), (-155.0, 71.0), (-166.0, 62.0),
        ],
        Lod::Low,
    );

    // South America
    renderer.add_coastline(
        vec![
            (-78.0, 8.0), (-60.0, 5.0), (-35.0, -6.0), (-40.0, -22.0),
            (-55.0, -35.0), (-68.0, -52.0), (-74.0, -45.0), (-71.0, -18.0),
            (-80.0, -3.0), (-78.0, 8.0),
        ],
        Lod::Low,
    );

    // Europe
    renderer.add_coastline(
        vec![
            (-9.0, 37.0), (3.0, 40.0), (12.0, 44.0), (23.0, 38.0),
            (36.0, 42.0), (40.0, 55.0), (28.0, 62.0), (18.0, 70.0),
            (7.0, 62.0), (-4.0, 58.0), (-10.0, 51.0), (-9.0, 37.0),
        ],
        Lod::Low,
    );

    // Africa
    renderer.add_coastline(
        vec![
            (-16.0, 24.0), (-6.0, 35.0), (11.0, 37.0), (32.0, 31.0),
            (43.0, 12.0), (51.0, 11.0), (40.0, -10.0), (35.0, -24.0),
            (19.0, -35.0), (12.0, -18.0), (9.0, 4.0), (-12.0, 8.0),
            (-17.0, 15.0), (-16.0, 24.0),
        ],
        Lod::Low,
    );

    // Asia
    renderer.add_coastline(
        vec![
            (40.0, 43.0), (55.0, 38.0), (60.0, 25.0), (72.0, 20.0),
            (78.0, 8.0), (90.0, 22.0), (98.0, 10.0), (109.0, 12.0),
            (122.0, 24.0), (122.0, 40.0), (135.0, 44.0), (142.0, 54.0),
            (158.0, 62.0), (178.0, 66.0), (140.0, 72.0), (100.0, 73.0),
            (68.0, 69.0), (55.0, 66.0), (48.0, 55.0), (40.0, 43.0),
        ],
        Lod::Low,
    );

    // Australia
    renderer.add_coastline(
        vec![
            (114.0, -22.0), (129.0, -14.0), (142.0, -11.0), (147.0, -19.0),
            (153.0, -27.0), (150.0, -37.0), (140.0, -38.0), (129.0, -32.0),
            (116.0, -35.0), (114.0, -22.0),
        ],
        Lod::Low,
    );

    // Japan
    renderer.add_coastline(
        vec![
            (130.0, 31.0), (135.0, 34.0), (140.0, 36.0), (141.5, 43.0),
            (140.0, 41.0), (136.0, 36.0), (131.0, 33.0), (130.0, 31.0),
        ],
        Lod::Low,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_world_populates_renderer() {
        let mut renderer = MapRenderer::new();
        assert!(!renderer.has_data());
        builtin_world(&mut renderer);
        assert!(renderer.has_data());
    }

    #[test]
    fn missing_data_dir_is_harmless() {
        let mut renderer = MapRenderer::new();
        load_coastlines(&mut renderer, Path::new("/nonexistent"));
        assert!(!renderer.has_data());
    }
}
