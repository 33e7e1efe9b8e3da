use crate::domain::entities::scheme::Scheme;
use crate::domain::error::DomainError;
use crate::domain::values::farmer_profile::FarmerProfile;
use crate::domain::values::scheme_category::SchemeCategory;

pub trait SchemeRepository: Send + Sync {
    fn add(&self, scheme: &Scheme) -> Result<(), DomainError>;

    fn get_by_id(&self, id: &str) -> Result<Option<Scheme>, DomainError>;

    fn all(&self, category: Option<SchemeCategory>) -> Result<Vec<Scheme>, DomainError>;

    /// Structured candidate lookup for hybrid scheme matching: land-range
    /// containment, region membership (wildcard included), crop
    /// intersection. Empty eligibility lists match any value. Result order
    /// is the repository's insertion-stable order.
    fn find_candidates(&self, profile: &FarmerProfile) -> Result<Vec<Scheme>, DomainError>;

    /// Keyword substring search over name, description and eligible crops.
    fn search(&self, keyword: &str) -> Result<Vec<Scheme>, DomainError>;
}
