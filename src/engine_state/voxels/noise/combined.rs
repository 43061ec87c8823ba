use super::Noise;

/// Domain-warped noise: `a(x + b(x, y), y)`.
#[derive(Clone, Debug)]
pub struct CombinedNoise<A, B> {
    noise_a: A,
    noise_b: B,
}

impl<A: Noise, B: Noise> CombinedNoise<A, B> {
    /// Creates a combined noise where `noise_b` warps the x input of `noise_a`.
    pub fn new(noise_a: A, noise_b: B) -> Self {
        CombinedNoise { noise_a, noise_b }
    }
}

impl<A: Noise, B: Noise> Noise for CombinedNoise<A, B> {
    fn compute(&self, x: f32, y: f32) -> f32 {
        self.noise_a.compute(x + self.noise_b.compute(x, y), y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f32);

    impl Noise for Constant {
        fn compute(&self, _x: f32, _y: f32) -> f32 {
            self.0
        }
    }

    struct ReturnX;

    impl Noise for ReturnX {
        fn compute(&self, x: f32, _y: f32) -> f32 {
            x
        }
    }

    #[test]
    fn test_warps_x_only() {
        let noise = CombinedNoise::new(ReturnX, Constant(2.5));
        assert_eq!(noise.compute(1.0, 100.0), 3.5);
    }
}
