// Shared helpers for the format readers

pub mod encoding;
pub mod io;
