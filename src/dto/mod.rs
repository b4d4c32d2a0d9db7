pub mod auth;
pub mod dashboard;
pub mod masters;
pub mod notes;
pub mod orders;
pub mod public;
