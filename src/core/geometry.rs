use crate::core::error::{MeshError, MeshResult};
use nalgebra::Point3;

/// A polygon as an ordered, cyclic list of vertex indices.
pub type Face = Vec<usize>;

/// A vertex snapped to the integer quantization grid, stored as `[x, y, z]`.
pub type QuantizedVertex = [i32; 3];

/// Raw result of parsing an OBJ file.
///
/// Every distinct composite face reference (`v/vt/vn`) becomes one record in
/// `vertices`, so a record may carry more than three components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    /// Flattened vertex records.
    pub vertices: Vec<Vec<f32>>,
    /// Faces indexing into `vertices` (0-based).
    pub faces: Vec<Face>,
}

impl ObjData {
    /// Leading `x, y, z` of every vertex record.
    pub fn positions(&self) -> MeshResult<Vec<Point3<f32>>> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, record)| match record.as_slice() {
                [x, y, z, ..] => Ok(Point3::new(*x, *y, *z)),
                _ => Err(MeshError::MalformedVertex {
                    index,
                    len: record.len(),
                }),
            })
            .collect()
    }
}

/// A polygon mesh with continuous vertex positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point3<f32>>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Axis-aligned unit cube centered at the origin, one quad per side.
    ///
    /// Quads wind counter-clockwise when viewed from outside.
    pub fn unit_cube() -> Self {
        let vertices = vec![
            Point3::new(-0.5, -0.5, -0.5),
            Point3::new(0.5, -0.5, -0.5),
            Point3::new(0.5, 0.5, -0.5),
            Point3::new(-0.5, 0.5, -0.5),
            Point3::new(-0.5, -0.5, 0.5),
            Point3::new(0.5, -0.5, 0.5),
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(-0.5, 0.5, 0.5),
        ];
        let faces = vec![
            vec![0, 3, 2, 1], // bottom
            vec![4, 5, 6, 7], // top
            vec![0, 1, 5, 4], // front
            vec![2, 3, 7, 6], // back
            vec![1, 2, 6, 5], // right
            vec![0, 4, 7, 3], // left
        ];
        Self::new(vertices, faces)
    }

    /// Checks that every face index points at an existing vertex.
    pub fn validate_indices(&self) -> MeshResult<()> {
        check_face_indices(&self.faces, self.vertices.len())
    }
}

/// Fails on the first face index that is `>= num_vertices`.
pub fn check_face_indices(faces: &[Face], num_vertices: usize) -> MeshResult<()> {
    match faces.iter().flatten().find(|&&i| i >= num_vertices) {
        Some(&index) => Err(MeshError::IndexOutOfRange {
            index,
            len: num_vertices,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_take_leading_xyz() {
        let data = ObjData {
            vertices: vec![vec![1.0, 2.0, 3.0, 9.0, 9.0, 9.0]],
            faces: vec![],
        };
        let positions = data.positions().unwrap();
        assert_eq!(positions, vec![Point3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn short_record_is_rejected() {
        let data = ObjData {
            vertices: vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]],
            faces: vec![],
        };
        assert!(matches!(
            data.positions(),
            Err(MeshError::MalformedVertex { index: 1, len: 2 })
        ));
    }

    #[test]
    fn cube_indices_are_valid() {
        let cube = Mesh::unit_cube();
        assert!(cube.validate_indices().is_ok());
        assert_eq!(cube.faces.len(), 6);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mesh = Mesh::new(vec![Point3::origin(); 3], vec![vec![0, 1, 3]]);
        assert!(matches!(
            mesh.validate_indices(),
            Err(MeshError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }
}
