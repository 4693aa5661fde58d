pub mod file_rule_source;
