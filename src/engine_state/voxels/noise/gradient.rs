use noise::{NoiseFn, Perlin};

use super::Noise;

/// Offsets are drawn from `[-OFFSET_RANGE, OFFSET_RANGE)`.
const OFFSET_RANGE: f32 = 10_000.0;

/// A single octave of gradient noise.
///
/// The lattice itself is shared by every instance; what distinguishes two
/// instances is the offset added to each sample position, drawn once from the
/// random generator passed to [`GradientNoise::new`].
#[derive(Clone, Debug)]
pub struct GradientNoise {
    perlin: Perlin,
    offset_x: f32,
    offset_y: f32,
}

impl GradientNoise {
    /// Creates a gradient noise with offsets drawn from `rng`.
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        let mut draw = || rng.f32() * 2.0 * OFFSET_RANGE - OFFSET_RANGE;
        let offset_x = draw();
        let offset_y = draw();
        Self::with_offsets(offset_x, offset_y)
    }

    /// Creates a gradient noise sampled at a fixed offset.
    pub fn with_offsets(offset_x: f32, offset_y: f32) -> Self {
        GradientNoise {
            perlin: Perlin::new(Perlin::DEFAULT_SEED),
            offset_x,
            offset_y,
        }
    }

    /// The `(x, y)` offset applied to every sample.
    pub fn offsets(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }
}

impl Noise for GradientNoise {
    fn compute(&self, x: f32, y: f32) -> f32 {
        let sample_x = x as f64 + self.offset_x as f64;
        let sample_y = y as f64 + self.offset_y as f64;
        self.perlin.get([sample_x, sample_y]) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let a = GradientNoise::new(&mut fastrand::Rng::with_seed(7));
        let b = GradientNoise::new(&mut fastrand::Rng::with_seed(7));
        for i in 0..32 {
            let (x, y) = (i as f32 * 0.37, i as f32 * -1.13);
            assert_eq!(a.compute(x, y), b.compute(x, y));
        }
    }

    #[test]
    fn test_offsets_are_bounded() {
        let mut rng = fastrand::Rng::with_seed(99);
        for _ in 0..100 {
            let (x, y) = GradientNoise::new(&mut rng).offsets();
            assert!(x.abs() <= OFFSET_RANGE && y.abs() <= OFFSET_RANGE);
        }
    }

    #[test]
    fn test_output_is_finite_and_bounded() {
        let noise = GradientNoise::new(&mut fastrand::Rng::with_seed(3));
        for i in 0..200 {
            let value = noise.compute(i as f32 * 0.61, i as f32 * 0.29);
            assert!(value.is_finite());
            assert!(value.abs() <= 1.5, "gradient noise out of range: {value}");
        }
    }
}
