pub mod client;
pub mod search_model;
