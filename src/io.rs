pub mod artifact;
pub mod config;
pub mod obj_loader;
pub mod obj_writer;
