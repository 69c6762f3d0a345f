pub mod file;
pub mod pagination;
pub mod preview;
pub mod search;
pub mod session;
pub mod stats;
pub mod upload;
