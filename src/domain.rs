pub mod entities;
pub mod localization;
pub mod use_cases;
