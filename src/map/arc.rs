//! Transient arc sprites: one per person-event per animation frame.
//!
//! Each sprite is fire-and-forget. The driver spawns it and never hears
//! back; the render loop draws whatever prefix of the path its reveal
//! phase has exposed, dims it through the fade phase, and prunes it once
//! its expiry passes.

use crate::data::{Category, EventTrack, PersonEvent};
use crate::map::geometry::LineString;
use glam::DVec3;
use std::time::{Duration, Instant};

/// Phase A: stroke reveal from zero length to full length
pub const REVEAL: Duration = Duration::from_millis(1000);
/// Phase B: opacity fade, chained after the reveal
pub const FADE: Duration = Duration::from_millis(2000);

/// Brightness bucket standing in for stroke opacity on a terminal
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Brightness {
    Bright,
    Mid,
    Faint,
}

/// One rendered arc, keyed to one event at one frame.
pub struct ArcSprite {
    pub category: Category,
    path: LineString,
    born: Instant,
}

impl ArcSprite {
    pub fn spawn(event: &PersonEvent, precision: f64, now: Instant) -> Self {
        let path = match &event.track {
            EventTrack::Line(coords) => sample_great_circle(coords, precision),
            EventTrack::Point(p) => vec![*p],
        };
        Self {
            category: event.category,
            path,
            born: now,
        }
    }

    /// Expiry is fixed at spawn: reveal duration plus fade duration.
    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.born) >= REVEAL + FADE
    }

    /// Visible prefix of the sampled path plus the current brightness.
    /// With `fade_out` disabled the sprite holds full brightness until
    /// expiry instead of dimming through phase B.
    pub fn visible(&self, now: Instant, fade_out: bool) -> (&[(f64, f64)], Brightness) {
        let age = now.duration_since(self.born);
        if age < REVEAL {
            let t = age.as_secs_f64() / REVEAL.as_secs_f64();
            let count = ((self.path.len() as f64) * t).ceil() as usize;
            let count = count.clamp(1, self.path.len());
            (&self.path[..count], Brightness::Bright)
        } else if !fade_out {
            (&self.path[..], Brightness::Bright)
        } else {
            let t = (age - REVEAL).as_secs_f64() / FADE.as_secs_f64();
            let brightness = if t < 1.0 / 3.0 {
                Brightness::Bright
            } else if t < 2.0 / 3.0 {
                Brightness::Mid
            } else {
                Brightness::Faint
            };
            (&self.path[..], brightness)
        }
    }

    /// Point events render as a dot instead of a stroke
    pub fn is_point(&self) -> bool {
        self.path.len() == 1
    }
}

/// Resample a line string along great circles so arcs curve on the
/// projected map the way resampled geo paths do. One sample roughly
/// every `20 * precision` degrees of arc (2 degrees at the default 0.1).
pub fn sample_great_circle(coords: &[(f64, f64)], precision: f64) -> LineString {
    let step_deg = (20.0 * precision).max(0.25);
    let mut out: LineString = Vec::new();

    for pair in coords.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let va = unit_vector(a.0, a.1);
        let vb = unit_vector(b.0, b.1);
        let angle = va.angle_between(vb);

        if out.is_empty() {
            out.push(a);
        }

        if angle < 1e-9 {
            out.push(b);
            continue;
        }

        let steps = ((angle.to_degrees() / step_deg).ceil() as usize).max(1);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            out.push(lonlat(slerp(va, vb, angle, t)));
        }
    }

    if out.is_empty() {
        out.extend_from_slice(coords);
    }
    out
}

fn unit_vector(lon: f64, lat: f64) -> DVec3 {
    let lon = lon.to_radians();
    let lat = lat.to_radians();
    DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

fn lonlat(v: DVec3) -> (f64, f64) {
    (v.y.atan2(v.x).to_degrees(), v.z.asin().to_degrees())
}

/// Spherical interpolation between two unit vectors separated by `angle`
fn slerp(a: DVec3, b: DVec3, angle: f64, t: f64) -> DVec3 {
    let sin = angle.sin();
    (a * ((1.0 - t) * angle).sin() + b * (t * angle).sin()) / sin
}
