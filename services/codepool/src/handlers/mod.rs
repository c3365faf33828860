pub mod admin;
pub mod visitor;
