mod app;
mod braille;
mod data;
mod map;
mod timeline;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use map::ProjectionConfig;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Animated map of arrivals and departures, year by year
#[derive(Parser, Debug)]
#[command(name = "arcmap", version, about)]
struct Args {
    /// Projection scale, relative to a 960-unit-wide surface
    #[arg(long, default_value_t = 180.0)]
    scale: f64,

    /// Width translation divisor (map center offset = width / wtdiv)
    #[arg(long, default_value_t = 1.8)]
    wtdiv: f64,

    /// Height translation divisor (map center offset = height / htdiv)
    #[arg(long, default_value_t = 1.3)]
    htdiv: f64,

    /// Great-circle resampling precision for arc paths
    #[arg(long, default_value_t = 0.1)]
    precision: f64,

    /// World topology file (TopoJSON)
    #[arg(long, default_value = "data/world-50m.json")]
    world: PathBuf,

    /// Person event collection (GeoJSON FeatureCollection)
    #[arg(long, default_value = "data/bornanddiedinamsterdam.geojson")]
    events: PathBuf,

    /// Skip the fade-out phase after the stroke reveal
    #[arg(long)]
    no_fade: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Both resources must load before anything renders; the first
    // failure is terminal and reported before the terminal is touched
    let world = data::load_world(&args.world);
    let events = data::load_events(&args.events);
    let (world, events) = match (world, events) {
        (Ok(world), Ok(events)) => (world, events),
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("error: {err:#}");
            return Err(err);
        }
    };

    let config = ProjectionConfig {
        scale: args.scale,
        wtdiv: args.wtdiv,
        htdiv: args.htdiv,
        precision: args.precision,
    };

    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = run(&mut terminal, &world, events, config, !args.no_fade);

    ratatui::restore();
    result
}

fn run(
    terminal: &mut DefaultTerminal,
    world: &map::Topology,
    events: Vec<data::PersonEvent>,
    config: ProjectionConfig,
    fade_out: bool,
) -> Result<()> {
    let mut app = App::new(world, events, config, fade_out, Instant::now())?;

    loop {
        let now = Instant::now();
        app.update(now);

        terminal.draw(|frame| ui::render(frame, &app, now))?;

        // Poll briefly so ticks stay close to their 20ms cadence
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                            _ => {}
                        }
                    }
                }
                // Projection and canvases follow the frame size on redraw
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
