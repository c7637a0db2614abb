use crate::core::error::MeshResult;
use crate::core::geometry::{Mesh, ObjData};
use crate::core::math::normalize::{center_vertices, normalize_vertices_scale, permute_to_z_up};
use crate::core::math::quantize::{dequantize_verts, dequantize_verts_dithered};
use crate::io::artifact::TrainingExample;
use crate::io::config::PipelineConfig;
use crate::io::obj_loader::load_obj;
use crate::process::augment::{TruncatedNormal, random_shift};
use crate::process::canonicalize::quantize_process_mesh;
use crate::process::flatten::{flatten_faces, unflatten_faces};
use log::debug;
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::time::Instant;

/// Loads an OBJ file and turns it into a training example.
///
/// # Arguments
/// * `path` - The file path to the .obj file.
/// * `config` - Quantization and augmentation settings.
///
/// # Returns
/// * `MeshResult<TrainingExample>` - Quantized vertices and flattened face tokens.
pub fn load_process_mesh<P: AsRef<Path>>(
    path: P,
    config: &PipelineConfig,
) -> MeshResult<TrainingExample> {
    let data = load_obj(path)?;
    process_obj_data(&data, config)
}

/// Puts vertices into the canonical frame: z up, box centered at the origin,
/// unit box diagonal.
pub fn normalize_positions(positions: &[Point3<f32>]) -> MeshResult<Vec<Point3<f32>>> {
    let vertices = permute_to_z_up(positions);
    let vertices = center_vertices(&vertices);
    normalize_vertices_scale(&vertices)
}

/// Normalizes, quantizes, canonicalizes and flattens parsed OBJ data.
pub fn process_obj_data(data: &ObjData, config: &PipelineConfig) -> MeshResult<TrainingExample> {
    let start = Instant::now();
    let n_bits = config.quantization_bits;

    let vertices = normalize_positions(&data.positions()?)?;
    let mesh = quantize_process_mesh(&vertices, &data.faces, None, n_bits)?;

    let vertices = if config.augment.apply_random_shift {
        let rng = match config.augment.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut sampler = TruncatedNormal::new(rng);
        random_shift(&mesh.vertices, config.augment.shift_factor, n_bits, &mut sampler)?
    } else {
        mesh.vertices
    };

    let faces = flatten_faces(&mesh.faces);
    debug!(
        "Processed mesh in {:?}: {} vertices, {} faces, {} tokens",
        start.elapsed(),
        vertices.len(),
        mesh.faces.len(),
        faces.len()
    );
    Ok(TrainingExample { vertices, faces })
}

/// Turns a training example (or a model sample of the same shape) back into
/// a mesh with continuous coordinates.
///
/// Pass an `rng` to dither the dequantized vertices.
pub fn decode_example<R: Rng>(
    example: &TrainingExample,
    n_bits: u32,
    rng: Option<&mut R>,
) -> MeshResult<Mesh> {
    let vertices = match rng {
        Some(rng) => dequantize_verts_dithered(&example.vertices, n_bits, rng)?,
        None => dequantize_verts(&example.vertices, n_bits)?,
    };
    let faces = unflatten_faces(&example.faces);
    let mesh = Mesh::new(vertices, faces);
    mesh.validate_indices()?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::MeshError;
    use crate::io::obj_loader::parse_obj;

    const QUAD_PYRAMID: &str = "\
v 0 0 0
v 2 0 0
v 2 0 2
v 0 0 2
v 1 3 1
f 1 2 3 4
f 1 2 5
f 2 3 5
f 3 4 5
f 4 1 5
";

    #[test]
    fn normalized_positions_fit_unit_diagonal() {
        let data = parse_obj(QUAD_PYRAMID).unwrap();
        let vertices = normalize_positions(&data.positions().unwrap()).unwrap();
        let (min, max) = crate::core::math::normalize::bounding_box(&vertices).unwrap();
        assert!(((max - min).norm() - 1.0).abs() < 1e-5);
        assert!((min.coords + max.coords).norm() < 1e-5);
    }

    #[test]
    fn pyramid_becomes_example() {
        let data = parse_obj(QUAD_PYRAMID).unwrap();
        let example = process_obj_data(&data, &PipelineConfig::default()).unwrap();
        assert_eq!(example.num_vertices(), 5);
        assert_eq!(example.num_faces(), 5);
        assert_eq!(example.faces.last(), Some(&0));
        assert!(example.vertices.iter().flatten().all(|&c| (0..=255).contains(&c)));
    }

    #[test]
    fn seeded_shift_is_reproducible() {
        let data = parse_obj(QUAD_PYRAMID).unwrap();
        let mut config = PipelineConfig::default();
        config.augment.apply_random_shift = true;
        config.augment.seed = Some(9);
        let a = process_obj_data(&data, &config).unwrap();
        let b = process_obj_data(&data, &config).unwrap();
        assert_eq!(a, b);
        let plain = process_obj_data(&data, &PipelineConfig::default()).unwrap();
        assert_eq!(a.faces, plain.faces);
    }

    #[test]
    fn decode_recovers_faces() {
        let data = parse_obj(QUAD_PYRAMID).unwrap();
        let example = process_obj_data(&data, &PipelineConfig::default()).unwrap();
        let mesh = decode_example::<StdRng>(&example, 8, None).unwrap();
        assert_eq!(mesh.vertices.len(), 5);
        assert_eq!(mesh.faces.len(), 5);
        assert!(mesh.vertices.iter().flat_map(|v| v.coords.iter()).all(|c| c.abs() <= 0.5 + 1e-6));
    }

    #[test]
    fn decode_rejects_dangling_indices() {
        let example = TrainingExample {
            vertices: vec![[0, 0, 0]],
            faces: vec![2, 3, 4, 0],
        };
        assert!(matches!(
            decode_example::<StdRng>(&example, 8, None),
            Err(MeshError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn flat_mesh_fails_to_scale() {
        let data = parse_obj("v 1 1 1\nv 1 1 1\nv 1 1 1\nf 1 2 3\n").unwrap();
        assert!(matches!(
            process_obj_data(&data, &PipelineConfig::default()),
            Err(MeshError::DegenerateBounds)
        ));
    }
}
