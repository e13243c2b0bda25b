//! Company data access port.

use crate::domain::company::Company;
use crate::domain::error::ArbError;

/// Source and sink for company records. Loaders validate records before
/// returning them; the scorers assume well-formed input.
pub trait CompanyPort {
    fn load_companies(&self) -> Result<Vec<Company>, ArbError>;

    fn save_companies(&self, companies: &[Company]) -> Result<(), ArbError>;
}
