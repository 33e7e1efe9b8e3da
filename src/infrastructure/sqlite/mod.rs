pub mod migrations;
pub mod scheme_repo;
pub mod vector_store;
