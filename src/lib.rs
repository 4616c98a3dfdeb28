pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::RupeeError;
pub use crate::core::money::Money;
pub use crate::core::services::RupeeService;

#[cfg(test)]
mod tests;
