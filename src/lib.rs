pub mod adapters;
pub mod application;
pub mod domain;
pub mod services;

#[cfg(test)]
mod test_support;
