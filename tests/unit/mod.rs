pub mod classifier_tests;
pub mod error_tests;
pub mod file_discovery_tests;
pub mod namespace_tests;
pub mod output_tests;
