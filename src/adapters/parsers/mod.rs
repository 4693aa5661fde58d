pub mod document;
pub mod ignore_parser;
pub mod json_parser;
pub mod toml_parser;
