//! Expose Folio's command implementations for use in integration tests. The
//! library API is [`folio_render`]; this crate only wires it to the command
//! line.
pub mod cli;
pub mod commands;
pub mod utils;
