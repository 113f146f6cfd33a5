pub mod auth;
pub mod content;
pub mod editor;
pub mod pages;
pub mod system;
pub mod workspace;
