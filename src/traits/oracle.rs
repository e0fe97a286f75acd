use async_trait::async_trait;

use crate::errors::VizResult;

/// A text-generation service: two role-tagged instructions in, generated text out.
///
/// Implementations make one remote call with no retry and return the final
/// response trimmed of surrounding whitespace. Which provider backs the trait
/// is decided by configuration (see `implementations::oracle_client::build_oracle`).
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> VizResult<String>;

    /// Short provider/model name for logs
    fn name(&self) -> String {
        "oracle".to_string()
    }
}
