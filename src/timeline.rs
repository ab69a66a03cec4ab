//! Year-stepped animation driver.
//!
//! The year index is the timeline: every distinct death year, ascending.
//! The driver owns a single cursor into it and advances one step per
//! tick on a fixed cadence. On the tick that reaches the final year the
//! frame is still rendered; the stop takes effect afterwards
//! (render-then-stop on the terminal tick).

use crate::data::PersonEvent;
use std::time::Duration;

/// Fixed tick cadence of the animation timer
pub const TICK: Duration = Duration::from_millis(20);

/// Build the ascending, de-duplicated sequence of distinct death years.
/// Sorting is numeric; the text fields were parsed during loading.
pub fn build_year_index(events: &[PersonEvent]) -> Vec<u16> {
    let mut years: Vec<u16> = events.iter().map(|e| e.death_year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Events whose death year matches the frame under the cursor
pub fn events_for_year(events: &[PersonEvent], year: u16) -> impl Iterator<Item = &PersonEvent> {
    events.iter().filter(move |e| e.death_year == year)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DriverState {
    Running,
    Stopped,
}

/// Driver-owned state: the year index, one cursor, one state flag.
/// The cursor advances by exactly one per tick and is never reset.
pub struct AnimationDriver {
    years: Vec<u16>,
    cursor: usize,
    state: DriverState,
}

impl AnimationDriver {
    /// An empty index starts Stopped: the static scene still renders,
    /// the animation loop simply never fires.
    pub fn new(years: Vec<u16>) -> Self {
        let state = if years.is_empty() {
            DriverState::Stopped
        } else {
            DriverState::Running
        };
        Self {
            years,
            cursor: 0,
            state,
        }
    }

    /// Frame rendered once, unconditionally, before the timer starts
    pub fn initial_year(&self) -> Option<u16> {
        self.years.first().copied()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// One timer tick. Returns the year to render this frame, or None
    /// once Stopped. The stop check against the timeline maximum happens
    /// before the render, but the terminal year's frame is still
    /// returned on the tick that detects it.
    pub fn tick(&mut self) -> Option<u16> {
        if self.state == DriverState::Stopped {
            return None;
        }
        let Some(&year) = self.years.get(self.cursor) else {
            self.state = DriverState::Stopped;
            return None;
        };
        if Some(year) == self.years.last().copied() {
            self.state = DriverState::Stopped;
        }
        self.cursor += 1;
        Some(year)
    }
}
