//! # Noise Library
//!
//! Composable scalar noise functions used as height generators.
//!
//! ## Variants
//! - [`GradientNoise`]: one octave of Perlin gradient noise sampled at a seeded offset
//! - [`OctaveNoise`]: a sum of gradient octaves with growing period and growing amplitude
//! - [`CombinedNoise`]: one noise field warping the x input of another
//!
//! Every variant is immutable after construction, so a single instance can be
//! sampled from any number of generation jobs at once.

mod combined;
mod gradient;
mod octave;

pub use combined::CombinedNoise;
pub use gradient::GradientNoise;
pub use octave::OctaveNoise;

/// A pure 2D scalar field.
pub trait Noise: Send + Sync {
    /// Samples the field at `(x, y)`.
    fn compute(&self, x: f32, y: f32) -> f32;
}

impl<N: Noise + ?Sized> Noise for Box<N> {
    fn compute(&self, x: f32, y: f32) -> f32 {
        (**self).compute(x, y)
    }
}
