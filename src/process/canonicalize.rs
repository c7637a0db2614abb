//! Canonical, deduplicated, quantized meshes.
//!
//! Quantization can merge distinct input vertices, which in turn can make a
//! face revisit a vertex (`[2, 3, 5, 2, 4]`). Such faces are split into the
//! simple cycles of their edge graph before faces are put in canonical order.

use crate::core::error::{MeshError, MeshResult};
use crate::core::geometry::{Face, QuantizedVertex, check_face_indices};
use crate::core::math::quantize::quantize_verts;
use crate::process::cycles::face_to_cycles;
use log::debug;
use nalgebra::Point3;

/// A triangle as three vertex indices.
pub type Triangle = [usize; 3];

/// Output of the canonicalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalMesh {
    /// Unique quantized vertices sorted by `(z, y, x)`.
    pub vertices: Vec<QuantizedVertex>,
    /// Faces, each starting at its smallest index, sorted by their sorted indices.
    pub faces: Vec<Face>,
    /// Triangles given alongside the faces, treated the same way except that
    /// degenerate ones are dropped instead of split.
    pub triangles: Option<Vec<Triangle>>,
}

/// Quantizes vertices, then canonicalizes the result.
///
/// # Arguments
/// * `vertices` - Positions inside `[-0.5, 0.5]`.
/// * `faces` - Faces indexing `vertices`.
/// * `triangles` - Optional triangulation carried along with the faces.
/// * `quantization_bits` - Grid width in bits.
///
/// # Returns
/// * `MeshResult<CanonicalMesh>` - The canonical mesh, or an error for a bad
///   bit width or an out-of-range index.
pub fn quantize_process_mesh(
    vertices: &[Point3<f32>],
    faces: &[Face],
    triangles: Option<&[Triangle]>,
    quantization_bits: u32,
) -> MeshResult<CanonicalMesh> {
    let quantized = quantize_verts(vertices, quantization_bits)?;
    canonicalize_quantized(&quantized, faces, triangles)
}

/// Deduplicates and sorts already-quantized vertices, re-indexes and splits
/// faces, sorts faces and drops vertices no face refers to.
///
/// Applying this to its own output returns the output unchanged.
pub fn canonicalize_quantized(
    vertices: &[QuantizedVertex],
    faces: &[Face],
    triangles: Option<&[Triangle]>,
) -> MeshResult<CanonicalMesh> {
    check_face_indices(faces, vertices.len())?;
    if let Some(tris) = triangles
        && let Some(&index) = tris.iter().flatten().find(|&&i| i >= vertices.len())
    {
        return Err(MeshError::IndexOutOfRange {
            index,
            len: vertices.len(),
        });
    }

    let (unique, remap) = dedup_sorted(vertices);
    debug!(
        "Merged {} quantized vertices into {}",
        vertices.len(),
        unique.len()
    );

    let faces: Vec<Face> = faces
        .iter()
        .map(|f| f.iter().map(|&i| remap[i]).collect())
        .collect();

    let mut sub_faces = split_loops(&faces);
    sort_by_sorted_indices(&mut sub_faces);

    let triangles = triangles.map(|tris| {
        let mut tris: Vec<Triangle> = tris
            .iter()
            .map(|t| t.map(|i| remap[i]))
            .filter(|t| t[0] != t[1] && t[1] != t[2] && t[0] != t[2])
            .collect();
        tris.sort_by_cached_key(|t| sorted(t));
        tris
    });

    let (referenced, new_index) = reference_map(unique.len(), &sub_faces);
    let vertices: Vec<QuantizedVertex> = unique
        .into_iter()
        .zip(&referenced)
        .filter_map(|(v, &keep)| keep.then_some(v))
        .collect();
    debug!(
        "{} faces after loop splitting, {} vertices after pruning",
        sub_faces.len(),
        vertices.len()
    );

    let faces = sub_faces
        .into_iter()
        .map(|f| f.into_iter().map(|i| new_index[i]).collect())
        .collect();
    let triangles = triangles.map(|tris| {
        tris.into_iter()
            .filter(|t| t.iter().all(|&i| referenced[i]))
            .map(|t| t.map(|i| new_index[i]))
            .collect()
    });

    Ok(CanonicalMesh {
        vertices,
        faces,
        triangles,
    })
}

/// Unique vertices in `(z, y, x)` order plus, for every input vertex, the
/// position of its representative.
fn dedup_sorted(vertices: &[QuantizedVertex]) -> (Vec<QuantizedVertex>, Vec<usize>) {
    let mut order: Vec<usize> = (0..vertices.len()).collect();
    order.sort_by_key(|&i| zyx_key(&vertices[i]));

    let mut unique: Vec<QuantizedVertex> = Vec::new();
    let mut remap = vec![0; vertices.len()];
    for i in order {
        if unique.last() != Some(&vertices[i]) {
            unique.push(vertices[i]);
        }
        remap[i] = unique.len() - 1;
    }
    (unique, remap)
}

fn zyx_key(v: &QuantizedVertex) -> [i32; 3] {
    [v[2], v[1], v[0]]
}

/// Replaces every face by its simple cycles of three or more vertices, each
/// rotated to start at its smallest index.
fn split_loops(faces: &[Face]) -> Vec<Face> {
    let mut sub_faces = Vec::with_capacity(faces.len());
    for face in faces {
        for mut cycle in face_to_cycles(face) {
            if cycle.len() > 2 {
                rotate_to_min(&mut cycle);
                sub_faces.push(cycle);
            }
        }
    }
    sub_faces
}

/// Rotates a cyclic face so its smallest index comes first.
pub fn rotate_to_min(face: &mut [usize]) {
    let start = face
        .iter()
        .enumerate()
        .min_by_key(|&(_, &v)| v)
        .map_or(0, |(pos, _)| pos);
    face.rotate_left(start);
}

/// Stable sort by the ascending tuple of each face's indices.
fn sort_by_sorted_indices(faces: &mut [Face]) {
    faces.sort_by_cached_key(|f| sorted(f));
}

fn sorted(indices: &[usize]) -> Vec<usize> {
    let mut key = indices.to_vec();
    key.sort_unstable();
    key
}

/// Which vertices some face uses, and each vertex's index once the unused
/// ones are removed (old index minus the unused vertices before it).
fn reference_map(num_vertices: usize, faces: &[Face]) -> (Vec<bool>, Vec<usize>) {
    let mut referenced = vec![false; num_vertices];
    for &i in faces.iter().flatten() {
        referenced[i] = true;
    }

    let mut removed = 0;
    let new_index = referenced
        .iter()
        .enumerate()
        .map(|(old, &keep)| {
            let index = old - removed;
            if !keep {
                removed += 1;
            }
            index
        })
        .collect();
    (referenced, new_index)
}
