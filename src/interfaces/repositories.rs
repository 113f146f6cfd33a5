pub mod admin;
pub mod document_store;
pub mod memory_store;
pub mod sqlx_repo;
pub mod token;
