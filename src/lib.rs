//! syncscroll
//!
//! Keeps several views of text documents scrolled in step. Whichever view
//! the user scrolls leads, and every other eligible view follows it, either
//! to the same line (`NORMAL`) or at the line distance captured when it took
//! the lead (`OFFSET`).
//!
//! The engine ([`sync`]) talks to views only through the [`host::SyncHost`]
//! trait. [`host::BufferHost`] is the in-memory host behind the terminal
//! front-end ([`view`]) and the tests.

pub mod config;
pub mod host;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod state;
pub mod store;
pub mod sync;
pub mod view;
