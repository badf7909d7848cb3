/// Configuration inspection commands
pub mod config;
/// Window geometry calculations
pub mod geometry;
/// Headless player session
pub mod session;
/// Subtitle helper commands
pub mod subtitles;
