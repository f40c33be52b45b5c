pub mod observability;
pub mod types;
