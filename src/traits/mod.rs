pub mod oracle;
pub mod prediction_api;

// Re-export traits
pub use oracle::Oracle;
pub use prediction_api::{ PredictionApi, PredictionResponse };
