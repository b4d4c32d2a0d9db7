pub mod auth_service;
pub mod dashboard_service;
pub mod master_service;
pub mod note_service;
pub mod order_service;
