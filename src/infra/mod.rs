pub mod file_system;
pub mod generator;
pub mod logger;
pub mod output;
