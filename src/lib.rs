pub mod api;
pub mod app;
pub mod basemap;
pub mod braille;
pub mod fetch;
pub mod map;
pub mod transform;
pub mod ui;
