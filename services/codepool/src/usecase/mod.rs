pub mod admin;
pub mod allocation;
pub mod import;
pub mod report;
pub mod seed;
