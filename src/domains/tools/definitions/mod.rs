//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod add_customer;
pub mod common;
pub mod get_customers;

pub use add_customer::{AddCustomerParams, AddCustomerTool};
pub use get_customers::{GetCustomersParams, GetCustomersTool};
