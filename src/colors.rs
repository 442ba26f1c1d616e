/// An 8-bit RGB colour.
pub type Rgb = (u8, u8, u8);

/// Colours used when rendering maze snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub wall: Rgb,
    pub open: Rgb,
    pub pheromone: Rgb,
    pub route: Rgb,
    pub start: Rgb,
    pub end: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            wall: (20, 20, 20),
            open: (235, 235, 235),
            pheromone: (0, 160, 0),  // Green
            route: (220, 40, 40),    // Red
            start: (40, 80, 220),    // Blue
            end: (240, 200, 0),      // Yellow
        }
    }
}

impl Palette {
    /// Open-cell colour blended towards the pheromone colour by `intensity`
    /// in [0, 1].
    pub fn pheromone_rgb(&self, intensity: f64) -> Rgb {
        let t = intensity.clamp(0.0, 1.0);
        let blend = |base: u8, tint: u8| -> u8 {
            (base as f64 + (tint as f64 - base as f64) * t).round() as u8
        };
        (
            blend(self.open.0, self.pheromone.0),
            blend(self.open.1, self.pheromone.1),
            blend(self.open.2, self.pheromone.2),
        )
    }
}
