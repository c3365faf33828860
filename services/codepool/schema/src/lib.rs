pub mod admins;
pub mod discount_codes;
pub mod visitors;
