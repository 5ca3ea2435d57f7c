// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive catalog.
//
// Module responsibilities:
// - `book`: The record type and its delimited line format (parse,
//   serialize, human-readable display).
// - `store`: Owns the in-memory collection, the next-id counter and
//   the backing file (load, save, CRUD).
// - `ui`: Implements the terminal menu flows and delegates to `store`.
//
// Keeping this separation makes it easier to test the store logic or
// replace the UI in the future (for example, adding a TUI or GUI).
pub mod book;
pub mod store;
pub mod ui;
