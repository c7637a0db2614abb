pub mod augment;
pub mod canonicalize;
pub mod cycles;
pub mod flatten;
pub mod pipeline;
