//! `wellby-cea` library crate.
//!
//! Estimates the cost-effectiveness of wellbeing coaching programmes in
//! WELLBYs (wellbeing-adjusted life years). The binary (`wellby`) is a thin
//! wrapper around this library so the engine is testable without spawning
//! processes.
//!
//! Layers, bottom-up:
//!
//! - `domain`: plain data types and constants
//! - `math`: PCHIP interpolation and series closed forms
//! - `models`: decay curve evaluation
//! - `integrate`: WELLBY totals over a horizon
//! - `programme`: per-programme evaluation, comparison and session costs
//! - `io`, `report`, `cli`, `app`: the outer shell

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod integrate;
pub mod io;
pub mod math;
pub mod models;
pub mod programme;
pub mod report;
