//! Core business logic for drinklog.

pub mod services;

pub use services::*;
