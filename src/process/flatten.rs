//! Face list <-> flat token sequence.
//!
//! Token layout: `0` stops the mesh, `1` starts the next face, and vertex
//! index `i` is written as `i + 2`.

use crate::core::geometry::Face;

pub const STOP_TOKEN: usize = 0;
pub const NEXT_FACE_TOKEN: usize = 1;
/// Offset between a vertex index and its token.
pub const INDEX_OFFSET: usize = 2;

/// Serializes faces into one token sequence ending in [`STOP_TOKEN`].
///
/// An empty face list becomes `[STOP_TOKEN]`.
pub fn flatten_faces(faces: &[Face]) -> Vec<usize> {
    let len = faces.iter().map(|f| f.len() + 1).sum::<usize>().max(1);
    let mut tokens = Vec::with_capacity(len);
    for (n, face) in faces.iter().enumerate() {
        tokens.extend(face.iter().map(|&i| i + INDEX_OFFSET));
        tokens.push(if n + 1 == faces.len() {
            STOP_TOKEN
        } else {
            NEXT_FACE_TOKEN
        });
    }
    if tokens.is_empty() {
        tokens.push(STOP_TOKEN);
    }
    tokens
}

/// Splits a token sequence back into faces.
///
/// Every stop or next-face token closes the current group. Whatever follows
/// the last boundary is discarded, so a sequence cut off mid-face yields the
/// complete faces before the cut. Groups of fewer than three vertices are
/// not polygons and are dropped.
pub fn unflatten_faces(tokens: &[usize]) -> Vec<Face> {
    let mut faces = Vec::new();
    let mut group = Vec::new();
    for &token in tokens {
        match token {
            STOP_TOKEN | NEXT_FACE_TOKEN => {
                let face = std::mem::take(&mut group);
                if face.len() > 2 {
                    faces.push(face);
                }
            }
            _ => group.push(token - INDEX_OFFSET),
        }
    }
    faces
}

/// Cuts a sampled token buffer to its reported length.
pub fn truncate(tokens: &[usize], length: usize) -> &[usize] {
    &tokens[..length.min(tokens.len())]
}
