mod file_controller;
mod search_filter_builder;
mod session_controller;
mod stats_view_model;
mod upload_controller;

pub use file_controller::{
    FileDataClient, FileListState, ListingMode, DELETE_FAILED, DOWNLOAD_FAILED, LOAD_FAILED,
    SEARCH_FAILED,
};
pub use search_filter_builder::{
    decode_size_token, size_selection_for, SearchFilterBuilder, SizeSelection,
};
pub use session_controller::{
    SessionStore, LOGIN_FAILED, MIN_PASSWORD_LENGTH, REGISTRATION_FAILED,
};
pub use stats_view_model::{StatsClient, StatsViewModel, STATS_FAILED};
pub use upload_controller::{UploadController, UPLOAD_FAILED};
