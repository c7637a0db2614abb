use crate::core::error::MeshResult;
use crate::core::geometry::QuantizedVertex;
use crate::process::flatten::unflatten_faces;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One prepared mesh as consumed by the sequence models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Canonical quantized vertices, one `[x, y, z]` row each.
    pub vertices: Vec<QuantizedVertex>,
    /// Flat face tokens, see `process::flatten`.
    pub faces: Vec<usize>,
}

impl TrainingExample {
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        unflatten_faces(&self.faces).len()
    }
}

pub fn save_example<P: AsRef<Path>>(path: P, example: &TrainingExample) -> MeshResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, example)?;
    writer.flush()?;
    info!(
        "Wrote training example ({} vertices, {} tokens) to {}",
        example.vertices.len(),
        example.faces.len(),
        path.display()
    );
    Ok(())
}

pub fn load_example<P: AsRef<Path>>(path: P) -> MeshResult<TrainingExample> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
