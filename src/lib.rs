#![cfg_attr(not(test), no_std)]
//! Platform-agnostic driver for the Silicon Labs Si705x digital temperature sensors.

pub mod si705x;

pub use crate::si705x::{raw_to_celsius, Config, FirmwareVersion, Model, Si705x};
