use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("catalog read error: {0}")]
    CatalogRead(#[from] std::io::Error),
    #[error("invalid element set for {catalog_number}: {message}")]
    InvalidElements { catalog_number: u32, message: String },
    #[error("propagation error for {catalog_number}: {message}")]
    Propagation { catalog_number: u32, message: String },
    #[error("invalid time window: {0}")]
    InvalidWindow(String),
    #[error("invalid observer site: {0}")]
    InvalidSite(String),
}
