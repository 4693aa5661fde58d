use std::path::PathBuf;

use super::document::EnvironmentDocument;
use crate::core::errors::{DriftError, Result};
use crate::core::models::environment::EnvironmentConfig;
use crate::core::traits::parser::EnvironmentParser;

/// Parses environment documents written as TOML.
///
/// Uses the same schema as JSON documents: `[[resources]]` tables with
/// `type`, `name`, `attrs` and `blocks`, plus a `[locals]` table.
pub struct TomlEnvironmentParser;

impl EnvironmentParser for TomlEnvironmentParser {
    fn parse(&self, content: &str) -> Result<EnvironmentConfig> {
        let doc: EnvironmentDocument =
            toml::from_str(content).map_err(|e| DriftError::ParseError {
                file: PathBuf::from("environment.toml"),
                detail: e.to_string(),
            })?;
        Ok(doc.into())
    }

    fn supported_extensions(&self) -> &[&str] {
        &["toml"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::value::Value;

    #[test]
    fn parse_tables_and_nested_blocks() {
        let content = r#"
[[resources]]
type = "aws_security_group"
name = "web"
attrs = { name = "web-sg" }

[[resources.blocks.ingress]]
attrs = { from_port = 80, protocol = "tcp" }

[[resources.blocks.ingress]]
attrs = { from_port = 443, protocol = "tcp" }

[[modules]]
name = "vpc"
attrs = { cidr = "10.0.0.0/16" }

[locals]
region = "eu-west-1"
ratio = 0.5
"#;

        let env = TomlEnvironmentParser.parse(content).unwrap();

        let sg = &env.resources[0];
        assert_eq!(sg.name, "web");
        assert_eq!(sg.blocks["ingress"].len(), 2);
        assert_eq!(sg.blocks["ingress"][1].attrs["from_port"], Value::from(443));
        assert_eq!(env.modules[0].attrs["cidr"], Value::from("10.0.0.0/16"));
        assert_eq!(env.locals.len(), 2);
    }

    #[test]
    fn integer_and_float_compare_equal_across_formats() {
        let toml_env = TomlEnvironmentParser
            .parse("[locals]\nreplicas = 1.0\n")
            .unwrap();
        assert_eq!(toml_env.locals[0].value, Value::from(1));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = TomlEnvironmentParser.parse("[[modules]]\nname = \"vpc\"\nsource = \"x\"\n");
        assert!(matches!(result, Err(DriftError::ParseError { .. })));
    }
}
