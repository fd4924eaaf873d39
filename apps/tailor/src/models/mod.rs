pub mod document;

pub use document::{DocumentKind, GenerationRequest, MasterDocument};
