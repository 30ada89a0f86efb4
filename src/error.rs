//! Error types.

use std::time::Duration;
use thiserror::Error;

/// Reasons an order is rejected before optimization starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The order has no line items.
    #[error("order contains no items")]
    EmptyOrder,

    /// The same drug appears on more than one line.
    #[error("drug {drug:?} appears more than once in the order")]
    DuplicateItem {
        /// The repeated drug identifier
        drug: String,
    },

    /// A line item asks for zero units.
    #[error("drug {drug:?} has a zero quantity")]
    InvalidQuantity {
        /// The offending drug identifier
        drug: String,
    },

    /// The order exceeds the configured item ceiling.
    #[error("order has {count} distinct items, the limit is {max}")]
    TooManyItems {
        /// Distinct items in the order
        count: usize,
        /// Configured ceiling
        max: usize,
    },
}

/// Failures of the external distance capability.
///
/// None of these are fatal: the shipping resolver answers every one of them
/// with a fallback estimate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    /// The service is not configured or refused the request.
    #[error("distance service unavailable: {0}")]
    Unavailable(String),

    /// The location key could not be geocoded.
    #[error("unknown location {0:?}")]
    UnknownLocation(String),

    /// The lookup did not finish in time.
    #[error("distance lookup timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered with a distance that cannot be priced.
    #[error("invalid distance {0}")]
    InvalidDistance(f64),
}
