pub mod admin;
pub mod trace;
