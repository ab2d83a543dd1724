pub mod admin_handler;
pub mod api_handler;
pub mod generator;
pub mod health_handler;
pub mod proxy;
