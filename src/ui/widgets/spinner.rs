//! In-flight indicator frames.

/// Braille spinner frames, advanced one step per tick.
///
pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Return the frame for the given spinner index.
///
pub fn frame(index: usize) -> &'static str {
    FRAMES[index % FRAMES.len()]
}
