pub mod admin;
pub mod contact;
pub mod content;
pub mod document;
pub mod faq;
pub mod language;
pub mod option_fields;
pub mod project;
pub mod service;
pub mod session;
pub mod token;
pub mod translation;
