pub mod db_init;
pub mod mfapi;

pub mod auth_service;
pub mod funds_service;
