pub mod auth;
pub mod content;
pub mod content_state;
pub mod editor;
pub mod extractors;
pub mod sample_data;
pub mod workspace;
