//! Data preparation for autoregressive polygon mesh models.
//!
//! OBJ meshes are normalized, quantized onto an integer grid, put into a
//! canonical vertex and face order, and flattened into a single token
//! sequence. The inverse path turns (possibly truncated) token sequences
//! back into OBJ files.

pub mod app;
pub mod core;
pub mod io;
pub mod process;

pub use crate::core::error::{MeshError, MeshResult};
pub use crate::core::geometry::{Face, Mesh, ObjData, QuantizedVertex};
