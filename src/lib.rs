//! NiriSetup - a menu-driven TUI for installing Niri on FreeBSD
//!
//! This library provides the menu/processing state machine, the action
//! runners that drive the package manager and validator, the session log and
//! the startup runtime-directory bootstrap.

pub mod action;
pub mod config;
pub mod runtime;
pub mod session;
pub mod ui;
