pub mod diagnosis;
pub mod scheme;
