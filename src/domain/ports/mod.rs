pub mod completion_port;
pub mod embedding_port;
pub mod scheme_repository;
pub mod vector_store;
