pub mod context;
pub mod error;
pub mod repositories;
pub mod services;
