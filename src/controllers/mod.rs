pub mod auth_controller;
pub mod funds_controller;
pub mod home_controller;
