use crate::data::PersonEvent;
use crate::map::arc::ArcSprite;
use crate::map::{ProjectionConfig, StaticScene, Topology};
use crate::timeline::{build_year_index, events_for_year, AnimationDriver, TICK};
use anyhow::Result;
use std::time::Instant;

/// Application state: one driver, one scene, one collection of live arcs
pub struct App {
    pub events: Vec<PersonEvent>,
    pub driver: AnimationDriver,
    pub scene: StaticScene,
    pub config: ProjectionConfig,
    /// Live sprites; expired ones are pruned each update
    pub arcs: Vec<ArcSprite>,
    /// Year counter text source; None until the first frame renders
    pub year: Option<u16>,
    pub fade_out: bool,
    pub should_quit: bool,
    /// Wall-clock anchor the tick cadence is derived from
    last_tick: Instant,
}

impl App {
    pub fn new(
        topology: &Topology,
        events: Vec<PersonEvent>,
        config: ProjectionConfig,
        fade_out: bool,
        now: Instant,
    ) -> Result<Self> {
        let scene = StaticScene::from_topology(topology)?;
        let driver = AnimationDriver::new(build_year_index(&events));

        let mut app = Self {
            events,
            driver,
            scene,
            config,
            arcs: Vec::new(),
            year: None,
            fade_out,
            should_quit: false,
            last_tick: now,
        };

        // initial unconditional render, before the timer starts
        if let Some(year) = app.driver.initial_year() {
            app.spawn_frame(year, now);
        }

        Ok(app)
    }

    /// Render one frame: spawn an arc per matching event, update the counter
    fn spawn_frame(&mut self, year: u16, now: Instant) {
        for event in events_for_year(&self.events, year) {
            self.arcs.push(ArcSprite::spawn(event, self.config.precision, now));
        }
        self.year = Some(year);
    }

    /// Advance the animation clock. Ticks fire on the fixed cadence, run
    /// to completion one at a time, and stop firing once the driver is
    /// Stopped. Sprites past their expiry are pruned here; sprites from
    /// earlier ticks otherwise run out on their own.
    pub fn update(&mut self, now: Instant) {
        while self.driver.is_running() && now.duration_since(self.last_tick) >= TICK {
            self.last_tick += TICK;
            if let Some(year) = self.driver.tick() {
                self.spawn_frame(year, now);
            }
        }
        self.arcs.retain(|arc| !arc.expired(now));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
