//! # ifacepicker
//!
//! Lists network interfaces with their IPv4 addresses, lets the user pick
//! one, and prints the choice as `KEY=VALUE` lines for shell scripts:
//!
//! ```text
//! IFACE=eth0
//! IPADDR=192.168.1.20
//! ```
//!
//! The interesting part is [`parser`], which turns `ip a` output into an
//! ordered list of [`InterfaceRecord`]s. [`source`] decides where that
//! output comes from and [`menu`] handles the terminal side.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod menu;
pub mod parser;
pub mod source;

// Re-exports for convenience
pub use crate::{
    config::AppConfig,
    core::Application,
    error::{PickerError, Result},
    parser::{parse_lines, parse_reader, InterfaceRecord, NO_ADDRESS},
};
