//! Terminal front-end for Taleloom.
//!
//! A ratatui interface with one screen per session state: the prompt form,
//! the loading indicator, the story with its choices, and the error panel.

pub mod app;
pub mod shared;
pub mod terminal;
pub mod views;

#[cfg(test)]
mod test_support;
