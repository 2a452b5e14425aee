//! Dashboard Feature
//!
//! The single page of the application: live field grid and stream restart.

pub mod controller;
pub mod page;
