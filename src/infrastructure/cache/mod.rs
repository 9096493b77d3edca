//! Embedding cache backends

mod json_file;

pub use json_file::JsonFileEmbeddingCache;
