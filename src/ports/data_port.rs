//! Price data access port.

use crate::domain::error::TraderError;
use crate::domain::price::PricePoint;

pub trait DataPort {
    /// Full series for `symbol`, ordered oldest first.
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, TraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, TraderError>;
}
