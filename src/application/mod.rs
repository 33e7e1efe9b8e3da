pub mod advise;
pub mod diagnose;
pub mod hybrid_query;
pub mod market;
pub mod retry;
pub mod schemes;
pub mod semantic_query;
pub mod store_document;
pub mod structured;
