pub mod fingerprint;
pub mod host;
pub mod page_model;
