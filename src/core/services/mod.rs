pub mod comparison_service;
pub mod differ;
pub mod ignore_matcher;
