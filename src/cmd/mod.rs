/// Textual tag tree command.
pub mod dump;
/// File and tag statistics command.
pub mod info;
/// JSON rendering command.
pub mod json;
/// Shared CLI helpers.
pub mod util;
