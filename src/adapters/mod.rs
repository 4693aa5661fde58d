pub mod loaders;
pub mod parsers;
pub mod reporters;
pub mod rules;
