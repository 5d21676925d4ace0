mod all;
mod footer;
mod log;
mod notifications;
mod picker;
mod welcome;

use super::*;

pub use all::all as render;
