pub mod difference;
pub mod entity;
pub mod environment;
pub mod ignore_rule;
pub mod value;
