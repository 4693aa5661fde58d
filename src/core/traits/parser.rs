use crate::core::errors::Result;
use crate::core::models::environment::EnvironmentConfig;

/// Port for turning an environment document into the entity model.
///
/// Implementations only deserialize and convert; structural validation of
/// the result is left to `EnvironmentConfig::validate`.
pub trait EnvironmentParser: Send + Sync {
    /// Parse raw file content into an `EnvironmentConfig`.
    fn parse(&self, content: &str) -> Result<EnvironmentConfig>;

    /// File extensions this parser handles (e.g. `["json"]`).
    fn supported_extensions(&self) -> &[&str];
}
