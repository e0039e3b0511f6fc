pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod public;
pub mod reviews;
pub mod settings;
pub mod widget;
