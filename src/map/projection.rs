use std::f64::consts::FRAC_PI_4;

/// Reference surface width the `scale` parameter is expressed against.
/// A scale of 180 fills a 960-pixel-wide surface with the whole world.
const REFERENCE_WIDTH: f64 = 960.0;

/// Mercator blows up at the poles; clamp like web maps do.
const MAX_LAT: f64 = 85.05113;

/// Projection parameters, read once at startup and never mutated.
#[derive(Clone, Copy, Debug)]
pub struct ProjectionConfig {
    /// Projection scale relative to [`REFERENCE_WIDTH`]
    pub scale: f64,
    /// Width translation divisor (horizontal offset = width / wtdiv)
    pub wtdiv: f64,
    /// Height translation divisor (vertical offset = height / htdiv)
    pub htdiv: f64,
    /// Great-circle resampling precision for arc paths
    pub precision: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            scale: 180.0,
            wtdiv: 1.8,
            htdiv: 1.3,
            precision: 0.1,
        }
    }
}

/// A fixed Mercator projection mapping (lon, lat) to braille pixel
/// coordinates. Built once per frame from the config and the current
/// canvas pixel dimensions.
pub struct Projection {
    scale: f64,
    translate: (f64, f64),
    width: usize,
}

impl Projection {
    pub fn new(config: &ProjectionConfig, width: usize, height: usize) -> Self {
        Self {
            scale: config.scale * width as f64 / REFERENCE_WIDTH,
            translate: (width as f64 / config.wtdiv, height as f64 / config.htdiv),
            width,
        }
    }

    /// Canvas pixel width this projection was built for
    pub fn width(&self) -> usize {
        self.width
    }

    /// Project a geographic coordinate (lon, lat in degrees) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let lat = lat.clamp(-MAX_LAT, MAX_LAT);
        let x = self.scale * lon.to_radians() + self.translate.0;
        let y = -self.scale * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln() + self.translate.1;
        (x.round() as i32, y.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_origin_lands_at_translate() {
        let proj = Projection::new(&ProjectionConfig::default(), 960, 500);
        let (x, y) = proj.project(0.0, 0.0);
        // width / 1.8 and height / 1.3, rounded
        assert_eq!(x, 533);
        assert_eq!(y, 385);
    }

    #[test]
    fn test_east_is_right_north_is_up() {
        let proj = Projection::new(&ProjectionConfig::default(), 960, 500);
        let (x0, y0) = proj.project(0.0, 0.0);
        let (xe, _) = proj.project(45.0, 0.0);
        let (_, yn) = proj.project(0.0, 45.0);
        assert!(xe > x0);
        assert!(yn < y0);
    }

    #[test]
    fn test_scale_follows_canvas_width() {
        let config = ProjectionConfig::default();
        let wide = Projection::new(&config, 1920, 500);
        let narrow = Projection::new(&config, 480, 500);
        let span = |p: &Projection| p.project(90.0, 0.0).0 - p.project(-90.0, 0.0).0;
        assert!(span(&wide) > span(&narrow));
    }

    #[test]
    fn test_polar_latitudes_clamped() {
        let proj = Projection::new(&ProjectionConfig::default(), 960, 500);
        let (_, y_pole) = proj.project(0.0, 90.0);
        let (_, y_clamped) = proj.project(0.0, MAX_LAT);
        assert_eq!(y_pole, y_clamped);
    }
}
