pub mod auth;
pub mod business_service;
pub mod dashboard_service;
pub mod intake_service;
pub mod review_service;
pub mod sentiment;
pub mod social_card;
pub mod storage;
pub mod widget;
