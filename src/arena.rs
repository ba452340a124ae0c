//! Input surface geometry.
//!
//! The host reports the surface size; the core uses it for two things only:
//! pulling tokens back on-screen after the surface shrinks, and scattering
//! simulated contacts for test runs.

use rand::Rng;

use crate::token::Position;

/// Rectangular input surface, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arena {
    /// Surface width in host pixels.
    pub width: f32,
    /// Surface height in host pixels.
    pub height: f32,
}

impl Arena {
    /// Construct an arena of the given size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Centre point of the surface.
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// `true` if `p` lies on the surface (edges inclusive).
    pub fn contains(&self, p: Position) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// `Some(center)` when `p` has fallen off the surface, `None` otherwise.
    pub fn recenter(&self, p: Position) -> Option<Position> {
        if self.contains(p) {
            None
        } else {
            Some(self.center())
        }
    }

    /// Uniform random point at least `padding` away from every edge.
    ///
    /// When the surface is too small for the padding the inset collapses to
    /// the centre line on that axis.
    pub fn random_point<R: Rng + ?Sized>(&self, padding: f32, rng: &mut R) -> Position {
        Position::new(
            inset_sample(self.width, padding, rng),
            inset_sample(self.height, padding, rng),
        )
    }
}

fn inset_sample<R: Rng + ?Sized>(extent: f32, padding: f32, rng: &mut R) -> f32 {
    let span = extent - 2.0 * padding;
    if span <= 0.0 {
        return extent / 2.0;
    }
    padding + rng.gen::<f32>() * span
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_contains_and_recenter() {
        let a = Arena::new(400.0, 300.0);
        assert!(a.contains(Position::new(0.0, 300.0)));
        assert_eq!(a.recenter(Position::new(10.0, 10.0)), None);
        assert_eq!(a.recenter(Position::new(500.0, 10.0)), Some(Position::new(200.0, 150.0)));
        assert_eq!(a.recenter(Position::new(10.0, -1.0)), Some(a.center()));
    }

    #[test]
    fn test_random_point_respects_padding() {
        let a = Arena::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let p = a.random_point(90.0, &mut rng);
            assert!(p.x >= 90.0 && p.x <= 710.0, "x={}", p.x);
            assert!(p.y >= 90.0 && p.y <= 510.0, "y={}", p.y);
        }
    }

    #[test]
    fn test_random_point_on_tiny_surface() {
        let a = Arena::new(100.0, 400.0);
        let mut rng = StdRng::seed_from_u64(9);
        let p = a.random_point(90.0, &mut rng);
        assert_eq!(p.x, 50.0);
        assert!(a.contains(p));
    }
}
