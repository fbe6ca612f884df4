#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod registers;

pub use crate::config::{Config, ConnectionSettings};
pub use crate::device::{Ls7366r, StatusSnapshot};
pub use crate::error::{DriverError, DriverResult, Error, Result};
