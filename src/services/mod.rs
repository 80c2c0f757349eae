pub mod admin_token;
pub mod announcements;
