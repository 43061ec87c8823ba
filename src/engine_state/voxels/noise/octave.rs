use super::{GradientNoise, Noise};

/// A sum of independent gradient octaves.
///
/// Octave `i` is sampled at `(x / 2^i, y / 2^i)` and scaled by `2^i`, so higher
/// octaves contribute broader and larger features. The result is deliberately
/// left unnormalized; terrain parameters are tuned against this amplitude.
#[derive(Clone, Debug)]
pub struct OctaveNoise {
    octaves: Vec<GradientNoise>,
}

impl OctaveNoise {
    /// Creates `count` octaves, each drawing its own offsets from `rng`.
    pub fn new(rng: &mut fastrand::Rng, count: usize) -> Self {
        OctaveNoise {
            octaves: (0..count).map(|_| GradientNoise::new(rng)).collect(),
        }
    }

    /// Builds an octave noise from explicit octaves.
    pub fn from_octaves(octaves: Vec<GradientNoise>) -> Self {
        OctaveNoise { octaves }
    }

    /// Number of octaves summed.
    pub fn octave_count(&self) -> usize {
        self.octaves.len()
    }
}

impl Noise for OctaveNoise {
    fn compute(&self, x: f32, y: f32) -> f32 {
        let mut result = 0.0;
        let mut scale = 1.0;
        for octave in &self.octaves {
            result += octave.compute(x / scale, y / scale) * scale;
            scale *= 2.0;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_matches_manual_expansion() {
        let octaves = vec![
            GradientNoise::with_offsets(0.3, 0.1),
            GradientNoise::with_offsets(12.5, -4.25),
            GradientNoise::with_offsets(-7.75, 33.5),
        ];
        let expected = |x: f32, y: f32| {
            octaves[0].compute(x, y)
                + octaves[1].compute(x / 2.0, y / 2.0) * 2.0
                + octaves[2].compute(x / 4.0, y / 4.0) * 4.0
        };
        let noise = OctaveNoise::from_octaves(octaves.clone());

        for i in 0..16 {
            let (x, y) = (i as f32 * 1.7, i as f32 * 0.45);
            assert!((noise.compute(x, y) - expected(x, y)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_empty_octave_noise_is_zero() {
        let noise = OctaveNoise::from_octaves(Vec::new());
        assert_eq!(noise.compute(1.5, 2.5), 0.0);
    }
}
