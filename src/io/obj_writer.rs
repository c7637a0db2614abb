use crate::core::error::MeshResult;
use crate::core::geometry::Face;
use log::info;
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Options applied to vertices on export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriteOptions {
    /// Reorder axes `(x, y, z) -> (y, z, x)`, undoing the z-up permutation.
    pub transpose: bool,
    /// Uniform scale applied after transposition.
    pub scale: f32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            transpose: true,
            scale: 1.0,
        }
    }
}

/// Writes vertices and faces to an OBJ file.
///
/// # Arguments
/// * `path` - Destination file, created or truncated.
/// * `vertices` - Vertex positions.
/// * `faces` - Faces indexing `vertices`, 0-based or 1-based.
/// * `options` - Axis transpose and scale applied on output.
///
/// # Returns
/// * `MeshResult<()>` - Any I/O error hit while writing.
pub fn save_obj<P: AsRef<Path>>(
    path: P,
    vertices: &[Point3<f32>],
    faces: &[Face],
    options: WriteOptions,
) -> MeshResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(&mut writer, vertices, faces, options)?;
    writer.flush()?;
    info!(
        "Saved {} vertices and {} faces to {}",
        vertices.len(),
        faces.len(),
        path.display()
    );
    Ok(())
}

/// Writes one `v` line per vertex followed by one `f` line per face.
///
/// Face indices are emitted 1-based when the smallest index across all faces
/// is 0 and unchanged otherwise, so the input must be uniformly 0-based or
/// uniformly 1-based. Mixed bases are not detected.
pub fn write_obj<W: Write>(
    writer: &mut W,
    vertices: &[Point3<f32>],
    faces: &[Face],
    options: WriteOptions,
) -> MeshResult<()> {
    for v in vertices {
        let v = if options.transpose {
            Point3::new(v.y, v.z, v.x)
        } else {
            *v
        };
        let v = v * options.scale;
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    let f_add = match faces.iter().flatten().min() {
        Some(&0) => 1,
        _ => 0,
    };
    for face in faces {
        write!(writer, "f")?;
        for &i in face {
            write!(writer, " {}", i + f_add)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
