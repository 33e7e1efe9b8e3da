pub mod farmer_profile;
pub mod farmer_type;
pub mod intent;
pub mod scheme_category;
pub mod severity;
