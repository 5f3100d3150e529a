use anyhow::{Context, Result};
use catalog_dash::api::ApiClient;
use catalog_dash::app::App;
use catalog_dash::fetch::{self, FetchMode};
use catalog_dash::{basemap, ui};
use clap::{Parser, ValueEnum};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    /// Raw collections; aggregation runs client-side
    Legacy,
    /// Server-aggregated dashboard plus geocache
    Aggregated,
}

impl From<ModeArg> for FetchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Legacy => FetchMode::Legacy,
            ModeArg::Aggregated => FetchMode::Aggregated,
        }
    }
}

#[derive(Parser)]
#[command(name = "catalog-dash", about = "Terminal dashboard for a video-game catalog API")]
struct Args {
    /// Base URL of the catalog API
    #[arg(long, default_value = "http://localhost:3000")]
    api: String,

    /// Which upstream contract to speak
    #[arg(long, value_enum, default_value_t = ModeArg::Aggregated)]
    mode: ModeArg,

    /// Directory with Natural Earth coastline GeoJSON files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Write tracing output to this file (stderr would corrupt the
    /// raw-mode terminal; without this flag logging is off)
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_logging(path: &PathBuf) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log {
        init_logging(path)?;
    }

    let client = ApiClient::new(&args.api)?;

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, &args, &client);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for panning and zooming the map panel
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click and drag to pan
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, args: &Args, client: &ApiClient) -> Result<()> {
    let mut app = App::new(args.mode.into());

    basemap::load_coastlines(&mut app.map_renderer, &args.data_dir);
    if !app.map_renderer.has_data() {
        basemap::builtin_world(&mut app.map_renderer);
    }

    let (tx, rx) = mpsc::channel();
    app.begin_loading();
    fetch::spawn_all(client, app.mode, &tx);

    // Main loop
    loop {
        // Drain completed fetches; sources finish in any order
        while let Ok(update) = rx.try_recv() {
            app.apply(update);
        }

        // Draw
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Pan with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                            KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            // Layer toggles
                            KeyCode::Char('L') => {
                                app.map_renderer.toggle_labels();
                            }
                            KeyCode::Char('c') | KeyCode::Char('C') => {
                                app.map_renderer.toggle_coastlines();
                            }

                            // Refresh all sources
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                app.begin_loading();
                                fetch::spawn_all(client, app.mode, &tx);
                            }

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                // Panel geometry is recomputed every draw
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
