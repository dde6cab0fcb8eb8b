use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("Index constituents unavailable: {0}")]
    DataUnavailable(String),

    #[error("No usable market data for any constituent")]
    NoDataAvailable,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Delivery failed: {0}")]
    DeliveryError(String),
}
