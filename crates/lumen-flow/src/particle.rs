//! Particles: the units of colour that travel across the graph.

use lumen_graph::{DirectionSet, PixelIndex};

use crate::clock::elapsed;
use crate::color::Rgb;

/// A travelling point of light.
///
/// Position, preferences and appearance are public so hooks can steer and
/// recolour particles as they age. Birth time and the first-frame flag are
/// managed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Particle {
    /// Current pixel.
    pub position: PixelIndex,
    /// Travel preferences for the next hop.
    pub directions: DirectionSet,
    /// Milliseconds to live, 0 for forever.
    pub lifespan: u64,
    pub color: Rgb,
    /// Applied on top of `color` when rendering, 255 = full.
    pub brightness: u8,
    /// Free for client use, typically a palette position.
    pub color_index: u8,
    born_at: u64,
    first_frame: bool,
}

impl Particle {
    /// A white, full-brightness particle born at `now`.
    pub fn new(position: PixelIndex, directions: DirectionSet, lifespan: u64, now: u64) -> Self {
        Self {
            position,
            directions,
            lifespan,
            color: Rgb::WHITE,
            brightness: u8::MAX,
            color_index: 0,
            born_at: now,
            first_frame: true,
        }
    }

    /// Restart the particle's life at `now`.
    pub fn reset(&mut self, now: u64) {
        self.born_at = now;
    }

    /// When the particle was born.
    pub fn born_at(&self) -> u64 {
        self.born_at
    }

    /// Age at `now`, capped at the lifespan for finite particles.
    ///
    /// Useful for brightness ramps that run from birth to death.
    pub fn age(&self, now: u64) -> u64 {
        let age = self.exact_age(now);
        if self.lifespan == 0 {
            age
        } else {
            age.min(self.lifespan)
        }
    }

    /// Uncapped age at `now`.
    pub fn exact_age(&self, now: u64) -> u64 {
        elapsed(now, self.born_at)
    }

    /// Whether the particle has outlived a finite lifespan.
    pub fn is_expired(&self, now: u64) -> bool {
        self.lifespan != 0 && self.exact_age(now) > self.lifespan
    }

    /// True until the end of the frame the particle was created in.
    pub fn is_first_frame(&self) -> bool {
        self.first_frame
    }

    pub(crate) fn end_first_frame(&mut self) {
        self.first_frame = false;
    }

    /// Colour as drawn: `color` scaled by `brightness`.
    pub fn rendered_color(&self) -> Rgb {
        self.color.scaled(self.brightness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_graph::EdgeTypes;

    fn particle(lifespan: u64) -> Particle {
        Particle::new(PixelIndex(3), DirectionSet::single(EdgeTypes::OUTBOUND), lifespan, 1_000)
    }

    #[test]
    fn new_particle_is_on_first_frame() {
        let p = particle(0);
        assert!(p.is_first_frame());
        assert_eq!(p.brightness, 255);
        assert_eq!(p.born_at(), 1_000);
    }

    #[test]
    fn age_is_capped_by_lifespan() {
        let p = particle(500);
        assert_eq!(p.age(1_200), 200);
        assert_eq!(p.age(9_000), 500);
        assert_eq!(p.exact_age(9_000), 8_000);
    }

    #[test]
    fn infinite_particles_keep_aging() {
        let p = particle(0);
        assert_eq!(p.age(61_000), 60_000);
        assert!(!p.is_expired(u64::MAX / 2));
    }

    #[test]
    fn expiry_is_strictly_after_lifespan() {
        let p = particle(500);
        assert!(!p.is_expired(1_500));
        assert!(p.is_expired(1_501));
    }

    #[test]
    fn reset_restarts_age() {
        let mut p = particle(500);
        p.reset(2_000);
        assert_eq!(p.age(2_100), 100);
    }

    #[test]
    fn rendered_color_applies_brightness() {
        let mut p = particle(0);
        p.color = Rgb::new(200, 100, 50);
        p.brightness = 0;
        assert_eq!(p.rendered_color(), Rgb::BLACK);
        p.brightness = 255;
        assert_eq!(p.rendered_color(), Rgb::new(200, 100, 50));
    }
}
