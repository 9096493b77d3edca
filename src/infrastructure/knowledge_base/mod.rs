//! Vector index provider implementations

mod factory;
mod in_memory;
mod pinecone;

pub use factory::IndexProviderFactory;
pub use in_memory::{InMemoryIndexProvider, IndexRecord};
pub use pinecone::PineconeIndexProvider;
