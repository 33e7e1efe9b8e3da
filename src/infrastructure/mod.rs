pub mod embeddings;
pub mod generative;
pub mod sqlite;
