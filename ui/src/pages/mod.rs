//! Application pages

pub mod dashboard;
pub mod forgot_password;
pub mod history;
pub mod login;
pub mod not_found;
pub mod notifications;
pub mod profile;
pub mod request;
pub mod resources;
