use std::path::PathBuf;

use super::document::EnvironmentDocument;
use crate::core::errors::{DriftError, Result};
use crate::core::models::environment::EnvironmentConfig;
use crate::core::traits::parser::EnvironmentParser;

/// Parses environment documents written as JSON.
pub struct JsonEnvironmentParser;

impl EnvironmentParser for JsonEnvironmentParser {
    fn parse(&self, content: &str) -> Result<EnvironmentConfig> {
        let doc: EnvironmentDocument =
            serde_json::from_str(content).map_err(|e| DriftError::ParseError {
                file: PathBuf::from("environment.json"),
                detail: e.to_string(),
            })?;
        Ok(doc.into())
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
