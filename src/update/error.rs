use thiserror::Error;

use crate::build::BuildNumberError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    MalformedBuildNumber(#[from] BuildNumberError),

    #[error("No product for build '{0}' in the catalog")]
    NoSuchProduct(String),
}
