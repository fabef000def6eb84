pub mod entities;
pub mod templates;
pub mod use_cases;
