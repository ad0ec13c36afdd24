//! Vitric engine crate.
//!
//! A minimal windowed-application runtime: owns the main loop, turns raw
//! window-system callbacks into a typed event stream, drives the active
//! scene once per frame, and manages GPU-backed image resources.

pub mod app;
pub mod canvas;
pub mod coords;
pub mod event;
pub mod gpu;
pub mod image;
pub mod scene;
pub mod time;

pub mod logging;
