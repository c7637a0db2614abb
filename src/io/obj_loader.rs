use crate::core::error::{MeshError, MeshResult};
use crate::core::geometry::ObjData;
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Loads an OBJ file from disk.
///
/// Only `v` and `f` lines are read. See [`parse_obj`] for the face handling.
///
/// # Arguments
/// * `path` - The file path to the .obj file.
///
/// # Returns
/// * `MeshResult<ObjData>` - Vertex records and faces, or the I/O or parse error.
pub fn load_obj<P: AsRef<Path>>(path: P) -> MeshResult<ObjData> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MeshError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    info!("Loading OBJ file: {}", path.display());
    let content = fs::read_to_string(path)?;
    let data = parse_obj(&content)?;

    info!(
        "OBJ loaded. Flattened vertices: {}, faces: {}",
        data.vertices.len(),
        data.faces.len()
    );
    Ok(data)
}

/// Parses OBJ text into flattened vertex records and faces.
///
/// Each distinct face token (`7`, `7/3`, `7//2`, `7/3/2`, ...) becomes one
/// vertex record: the concatenation of the `v` entries its slash-separated
/// indices refer to. Repeated tokens reuse the record created on first sight,
/// and faces index these records rather than the raw `v` list.
///
/// Indices are 1-based; negative indices count back from the last `v` line
/// declared so far.
pub fn parse_obj(content: &str) -> MeshResult<ObjData> {
    let mut positions: Vec<Vec<f32>> = Vec::new();
    let mut data = ObjData::default();
    let mut flat_indices: HashMap<String, usize> = HashMap::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(line_type) = tokens.next() else {
            continue;
        };

        match line_type {
            "v" => {
                let record = tokens
                    .map(|t| {
                        t.parse::<f32>()
                            .map_err(|e| MeshError::parse(line_no, format!("bad float '{t}': {e}")))
                    })
                    .collect::<MeshResult<Vec<f32>>>()?;
                positions.push(record);
            }
            "f" => {
                let mut face = Vec::new();
                for token in tokens {
                    if let Some(&index) = flat_indices.get(token) {
                        face.push(index);
                        continue;
                    }
                    let record = flatten_reference(token, &positions, line_no)?;
                    let index = data.vertices.len();
                    data.vertices.push(record);
                    flat_indices.insert(token.to_string(), index);
                    face.push(index);
                }
                data.faces.push(face);
            }
            _ => {}
        }
    }

    debug!(
        "Parsed {} position lines into {} flattened vertices",
        positions.len(),
        data.vertices.len()
    );
    Ok(data)
}

/// Concatenates the records a composite reference points at.
fn flatten_reference(token: &str, positions: &[Vec<f32>], line_no: usize) -> MeshResult<Vec<f32>> {
    let mut record = Vec::new();
    for part in token.split('/').filter(|p| !p.is_empty()) {
        let raw: i64 = part
            .parse()
            .map_err(|_| MeshError::parse(line_no, format!("bad face index '{part}' in '{token}'")))?;
        let index = resolve_index(raw, positions.len()).ok_or_else(|| {
            MeshError::parse(
                line_no,
                format!(
                    "face index {raw} out of range ({} vertices declared)",
                    positions.len()
                ),
            )
        })?;
        record.extend_from_slice(&positions[index]);
    }

    if record.is_empty() {
        return Err(MeshError::parse(
            line_no,
            format!("empty face reference '{token}'"),
        ));
    }
    Ok(record)
}

fn resolve_index(raw: i64, declared: usize) -> Option<usize> {
    let declared = declared as i64;
    let index = match raw {
        1.. => raw - 1,
        ..0 => declared + raw,
        0 => return None,
    };
    (0..declared).contains(&index).then_some(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# comment line
v 0.0 0.0 0.0
v 1.0 0.0 0.0

v 0.0 1.0 0.0
vn 0.0 0.0 1.0
f 1 2 3
";

    #[test]
    fn parses_plain_faces() {
        let data = parse_obj(TRIANGLE).unwrap();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.faces, vec![vec![0, 1, 2]]);
        assert_eq!(data.vertices[1], vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn repeated_tokens_share_a_record() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 3 2 4\n";
        let data = parse_obj(src).unwrap();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.faces, vec![vec![0, 1, 2], vec![2, 1, 3]]);
    }

    #[test]
    fn flattened_indices_follow_first_sight_order() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 3 1 2\n";
        let data = parse_obj(src).unwrap();
        assert_eq!(data.faces, vec![vec![0, 1, 2]]);
        assert_eq!(data.vertices[0], vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn composite_tokens_are_distinct_records() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/2 2/3 3/1\nf 1/2 2 3\n";
        let data = parse_obj(src).unwrap();
        // 1/2, 2/3, 3/1, 2, 3
        assert_eq!(data.vertices.len(), 5);
        assert_eq!(data.vertices[0], vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(data.faces[1], vec![0, 3, 4]);
    }

    #[test]
    fn empty_slots_are_skipped() {
        let data = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//2 2//3 3//1\n").unwrap();
        assert_eq!(data.vertices[0].len(), 6);
    }

    #[test]
    fn negative_indices_are_relative() {
        let data = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(data.vertices[2], vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn forward_reference_fails() {
        let err = parse_obj("v 0 0 0\nf 1 2 3\nv 1 0 0\nv 0 1 0\n").unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 2, .. }));
    }

    #[test]
    fn zero_index_fails() {
        assert!(parse_obj("v 0 0 0\nf 0 1 1\n").is_err());
    }

    #[test]
    fn bad_float_fails() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 1, .. }));
    }

    #[test]
    fn malformed_token_fails() {
        assert!(parse_obj("v 0 0 0\nf 1 a 1\n").is_err());
        assert!(parse_obj("v 0 0 0\nf 1 // 1\n").is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            load_obj("definitely/not/here.obj"),
            Err(MeshError::FileNotFound { .. })
        ));
    }
}
