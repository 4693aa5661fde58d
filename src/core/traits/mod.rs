pub mod parser;
pub mod reporter;
pub mod rule_source;
