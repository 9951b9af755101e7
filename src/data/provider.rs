//! The provider seam between the network and the assembler.

use crate::domain::{Series, SeriesRequest};
use crate::error::ProviderError;

/// Source of observation series.
///
/// Implementations return observations ascending by date with missing-value
/// markers already removed. Calls for different indicators may run
/// concurrently, hence `Sync`.
pub trait SeriesProvider: Send + Sync {
    fn name(&self) -> &str;

    fn fetch(&self, request: &SeriesRequest) -> Result<Series, ProviderError>;
}
