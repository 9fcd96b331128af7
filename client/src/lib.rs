//! Client library entry point: the search interaction engine.

pub mod api;
pub mod config;
pub mod error;
pub mod notification;
pub mod data_definitions;
pub mod pagination;
pub mod suggestions;
pub mod session;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;
