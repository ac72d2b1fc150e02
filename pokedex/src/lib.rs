//! Pokedex TUI
//!
//! Library half of the browser: formatting, evolution-chain flattening,
//! the PokeAPI client and the tui-dispatch store pieces. The binary wires
//! them to a terminal.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod evolution;
pub mod format;
pub mod logging;
pub mod reducer;
pub mod state;
