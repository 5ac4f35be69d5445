//! System utilities
//!
//! This module provides system-level functionality like GPU detection and
//! memory reporting for the hardware validation tool.

pub mod gpu;
pub mod resources;
