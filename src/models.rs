pub mod auth;
pub mod billing;
pub mod business;
pub mod dashboard;
pub mod intake;
pub mod review;
pub mod social_card;
pub mod widget;
