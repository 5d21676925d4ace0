//! Application state management module.
//!
//! This module contains the core state management for the application:
//! - Main `State` struct that holds all application data
//! - The entity picker state machine
//! - Navigation types (View, Focus)
//! - State error handling

mod error;
mod navigation;
mod picker;

pub use error::StateError;
pub use navigation::{Focus, View};
pub use picker::{FetchPage, Picker, SearchPhase, SearchState, SelectedItem};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::State;
