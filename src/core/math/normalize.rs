use crate::core::error::{MeshError, MeshResult};
use nalgebra::Point3;

/// Axis-aligned bounding box of a vertex set, `None` when empty.
pub fn bounding_box(vertices: &[Point3<f32>]) -> Option<(Point3<f32>, Point3<f32>)> {
    let first = vertices.first()?;
    let mut min_bound = *first;
    let mut max_bound = *first;

    for v in &vertices[1..] {
        min_bound.x = min_bound.x.min(v.x);
        min_bound.y = min_bound.y.min(v.y);
        min_bound.z = min_bound.z.min(v.z);

        max_bound.x = max_bound.x.max(v.x);
        max_bound.y = max_bound.y.max(v.y);
        max_bound.z = max_bound.z.max(v.z);
    }

    Some((min_bound, max_bound))
}

/// Reorders axes from `(x, y, z)` to `(z, x, y)` so the model's up axis ends up last.
///
/// `io::obj_writer` undoes this with its `transpose` option.
pub fn permute_to_z_up(vertices: &[Point3<f32>]) -> Vec<Point3<f32>> {
    vertices.iter().map(|v| Point3::new(v.z, v.x, v.y)).collect()
}

/// Translates vertices so the bounding box center sits at the origin.
pub fn center_vertices(vertices: &[Point3<f32>]) -> Vec<Point3<f32>> {
    let Some((min_bound, max_bound)) = bounding_box(vertices) else {
        return Vec::new();
    };
    let center = nalgebra::center(&min_bound, &max_bound);
    vertices
        .iter()
        .map(|v| Point3::from(v - center))
        .collect()
}

/// Scales vertices so the long diagonal of the bounding box has length one.
pub fn normalize_vertices_scale(vertices: &[Point3<f32>]) -> MeshResult<Vec<Point3<f32>>> {
    let (min_bound, max_bound) = bounding_box(vertices).ok_or(MeshError::EmptyMesh)?;
    let scale = (max_bound - min_bound).norm();
    if scale <= 0.0 || !scale.is_finite() {
        return Err(MeshError::DegenerateBounds);
    }
    Ok(vertices.iter().map(|v| Point3::from(v.coords / scale)).collect())
}
