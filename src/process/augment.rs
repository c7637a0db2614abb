use crate::core::error::MeshResult;
use crate::core::geometry::QuantizedVertex;
use crate::core::math::quantize::max_level;
use log::{debug, warn};
use rand::Rng;
use rand_distr::{Distribution, Normal};

const MIN_SHIFT_BOUND: f32 = 1e-9;
const MAX_REJECTION_ROUNDS: usize = 1000;

/// Source of shift amounts for [`random_shift`].
pub trait ShiftSampler {
    /// Draws from a zero-mean normal with standard deviation `scale`,
    /// truncated to `[low, high]`.
    fn sample(&mut self, scale: f32, low: f32, high: f32) -> f32;
}

/// Rejection sampler over [`Normal`] draws.
pub struct TruncatedNormal<R: Rng> {
    rng: R,
}

impl<R: Rng> TruncatedNormal<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ShiftSampler for TruncatedNormal<R> {
    fn sample(&mut self, scale: f32, low: f32, high: f32) -> f32 {
        let normal = match Normal::new(0.0, scale) {
            Ok(normal) if scale > 0.0 => normal,
            _ => return 0.0_f32.clamp(low, high),
        };
        for _ in 0..MAX_REJECTION_ROUNDS {
            let x = normal.sample(&mut self.rng);
            if (low..=high).contains(&x) {
                return x;
            }
        }
        warn!("Truncated normal rejection limit hit for [{low}, {high}], sampling uniformly");
        self.rng.random_range(low..=high)
    }
}

/// Translates the whole mesh by one random integer offset per axis, keeping
/// every coordinate inside `[0, 2^n_bits - 1]`.
///
/// Per axis the offset is drawn with scale `shift_factor * (2^n_bits - 1)`
/// and bounds `[-min, max_level - max]` of the current coordinates (each bound
/// floored at `1e-9`), then truncated toward zero.
pub fn random_shift<S: ShiftSampler>(
    vertices: &[QuantizedVertex],
    shift_factor: f32,
    n_bits: u32,
    sampler: &mut S,
) -> MeshResult<Vec<QuantizedVertex>> {
    let top = max_level(n_bits)?;
    if vertices.is_empty() {
        return Ok(Vec::new());
    }

    let mut shift = [0i32; 3];
    for (axis, s) in shift.iter_mut().enumerate() {
        let max = vertices.iter().map(|v| v[axis]).max().unwrap_or(top);
        let min = vertices.iter().map(|v| v[axis]).min().unwrap_or(0);
        let positive = ((top - max) as f32).max(MIN_SHIFT_BOUND);
        let negative = (min as f32).max(MIN_SHIFT_BOUND);
        let drawn = sampler.sample(shift_factor * top as f32, -negative, positive) as i32;
        // f32 bounds round at wide grids
        *s = drawn.min(top - max).max(-min);
    }
    debug!("Shifting vertices by {shift:?}");

    Ok(vertices
        .iter()
        .map(|v| [v[0] + shift[0], v[1] + shift[1], v[2] + shift[2]])
        .collect())
}
