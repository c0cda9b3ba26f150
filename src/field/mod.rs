pub mod field_model;
pub mod index;
