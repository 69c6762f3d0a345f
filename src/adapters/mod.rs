pub mod controllers;
pub mod dashboard;
pub mod notifiers;
pub mod repositories;
pub mod signal;
pub mod sinks;
