use crate::core::error::{MeshError, MeshResult};
use crate::io::artifact::{TrainingExample, load_example, save_example};
use crate::io::config::PipelineConfig;
use crate::io::obj_writer::save_obj;
use crate::process::flatten::truncate;
use crate::process::pipeline::{decode_example, load_process_mesh};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File written next to the artifacts of a batch run.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Summary of a batch run.
#[derive(Debug, Serialize)]
pub struct BatchManifest {
    pub generated_at: String,
    pub quantization_bits: u32,
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub source: PathBuf,
    pub artifact: Option<PathBuf>,
    pub num_vertices: usize,
    pub num_faces: usize,
    pub error: Option<String>,
}

impl BatchManifest {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_none()).count()
    }
}

/// Processes one OBJ file. Without `output` the artifact goes next to the
/// input with a `.json` extension.
pub fn run_process(
    input: &Path,
    output: Option<&Path>,
    config: &PipelineConfig,
) -> MeshResult<TrainingExample> {
    let start = Instant::now();
    let example = load_process_mesh(input, config)?;
    let output = output.map_or_else(|| input.with_extension("json"), Path::to_path_buf);
    save_example(&output, &example)?;
    info!(
        "Processed '{}' in {:.2?}: {} vertices, {} faces",
        input.display(),
        start.elapsed(),
        example.num_vertices(),
        example.num_faces()
    );
    Ok(example)
}

/// Processes every `.obj` below `input_dir` in parallel.
///
/// A failing mesh is logged and recorded in the manifest; it does not stop
/// the batch.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
) -> MeshResult<BatchManifest> {
    let start = Instant::now();
    let mut files = Vec::new();
    collect_obj_files(input_dir, &mut files)?;
    files.sort();
    info!(
        "Found {} OBJ files under '{}'",
        files.len(),
        input_dir.display()
    );

    fs::create_dir_all(output_dir)?;

    let entries: Vec<ManifestEntry> = files
        .par_iter()
        .map(|source| {
            let relative = source.strip_prefix(input_dir).unwrap_or(source);
            let artifact = output_dir.join(relative).with_extension("json");
            match process_into(source, &artifact, config) {
                Ok(example) => ManifestEntry {
                    source: source.clone(),
                    artifact: Some(artifact),
                    num_vertices: example.num_vertices(),
                    num_faces: example.num_faces(),
                    error: None,
                },
                Err(e) => {
                    warn!("Skipping '{}': {}", source.display(), e);
                    ManifestEntry {
                        source: source.clone(),
                        artifact: None,
                        num_vertices: 0,
                        num_faces: 0,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    let manifest = BatchManifest {
        generated_at: chrono::Utc::now().to_rfc3339(),
        quantization_bits: config.quantization_bits,
        entries,
    };
    let manifest_path = output_dir.join(MANIFEST_NAME);
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

    info!(
        "Batch finished in {:.2?}: {}/{} meshes processed, manifest at '{}'",
        start.elapsed(),
        manifest.succeeded(),
        manifest.entries.len(),
        manifest_path.display()
    );
    Ok(manifest)
}

fn process_into(source: &Path, artifact: &Path, config: &PipelineConfig) -> MeshResult<TrainingExample> {
    let example = load_process_mesh(source, config)?;
    if let Some(parent) = artifact.parent() {
        fs::create_dir_all(parent)?;
    }
    save_example(artifact, &example)?;
    Ok(example)
}

fn collect_obj_files(dir: &Path, files: &mut Vec<PathBuf>) -> MeshResult<()> {
    if !dir.is_dir() {
        return Err(MeshError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_obj_files(&path, files)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"))
        {
            files.push(path);
        } else {
            debug!("Ignoring '{}'", path.display());
        }
    }
    Ok(())
}

/// Writes a training artifact (or model sample) back out as an OBJ mesh.
///
/// `length` cuts the face tokens first, as done with sampled sequences.
pub fn run_decode(
    input: &Path,
    output: &Path,
    length: Option<usize>,
    config: &PipelineConfig,
) -> MeshResult<()> {
    let mut example = load_example(input)?;
    if let Some(length) = length {
        example.faces = truncate(&example.faces, length).to_vec();
    }

    let mut rng = if config.decode.add_noise {
        Some(match config.decode.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        })
    } else {
        None
    };
    let mesh = decode_example(&example, config.quantization_bits, rng.as_mut())?;
    if mesh.faces.is_empty() {
        warn!("'{}' decodes to a mesh without faces", input.display());
    }

    save_obj(output, &mesh.vertices, &mesh.faces, config.export.write_options()).inspect_err(
        |e| error!("Failed to write '{}': {}", output.display(), e),
    )
}
