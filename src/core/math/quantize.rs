use crate::core::error::{MeshError, MeshResult};
use crate::core::geometry::QuantizedVertex;
use nalgebra::Point3;
use rand::Rng;

/// Lower bound of the continuous coordinate range mapped onto the grid.
pub const MIN_RANGE: f32 = -0.5;
/// Upper bound of the continuous coordinate range mapped onto the grid.
pub const MAX_RANGE: f32 = 0.5;
/// Largest supported bit width; keeps `2^n - 1` inside `i32`.
pub const MAX_QUANTIZATION_BITS: u32 = 30;

/// Highest grid level for `n_bits`, i.e. `2^n_bits - 1`.
pub fn max_level(n_bits: u32) -> MeshResult<i32> {
    if n_bits == 0 || n_bits > MAX_QUANTIZATION_BITS {
        return Err(MeshError::InvalidQuantizationBits(n_bits));
    }
    Ok((1i32 << n_bits) - 1)
}

/// Maps coordinates in `[MIN_RANGE, MAX_RANGE]` onto `[0, 2^n_bits - 1]`.
///
/// Values are truncated toward zero, not rounded. The affine map runs in
/// `f64`, which holds every grid level exactly.
pub fn quantize_verts(vertices: &[Point3<f32>], n_bits: u32) -> MeshResult<Vec<QuantizedVertex>> {
    let range_quantize = f64::from(max_level(n_bits)?);
    let span = f64::from(MAX_RANGE - MIN_RANGE);
    let quantize =
        |c: f32| ((f64::from(c) - f64::from(MIN_RANGE)) * range_quantize / span) as i32;
    Ok(vertices
        .iter()
        .map(|v| [quantize(v.x), quantize(v.y), quantize(v.z)])
        .collect())
}

/// Maps grid levels back to continuous coordinates.
pub fn dequantize_verts(vertices: &[QuantizedVertex], n_bits: u32) -> MeshResult<Vec<Point3<f32>>> {
    let range_quantize = f64::from(max_level(n_bits)?);
    let span = f64::from(MAX_RANGE - MIN_RANGE);
    let dequantize =
        |q: i32| (f64::from(q) * span / range_quantize + f64::from(MIN_RANGE)) as f32;
    Ok(vertices
        .iter()
        .map(|q| Point3::new(dequantize(q[0]), dequantize(q[1]), dequantize(q[2])))
        .collect())
}

/// Like [`dequantize_verts`], with uniform noise in `[0, 1 / (2^n_bits - 1))`
/// added to every coordinate to hide the grid.
pub fn dequantize_verts_dithered<R: Rng>(
    vertices: &[QuantizedVertex],
    n_bits: u32,
    rng: &mut R,
) -> MeshResult<Vec<Point3<f32>>> {
    let step = 1.0 / max_level(n_bits)? as f32;
    let mut out = dequantize_verts(vertices, n_bits)?;
    for v in &mut out {
        for c in v.coords.iter_mut() {
            *c += rng.random::<f32>() * step;
        }
    }
    Ok(out)
}
