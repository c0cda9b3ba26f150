pub mod filter;
pub mod guard;
pub mod registry;
pub mod resolver;
