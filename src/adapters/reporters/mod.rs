pub mod json_reporter;
pub mod markdown_reporter;
