pub mod analytics;
pub mod auth;
pub mod brands;
pub mod communications;
pub mod contacts;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod tasks;
