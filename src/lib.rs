//! Terminal vocabulary builder: AI-assisted entry lookup, a persistent word
//! list, flashcard review, a timed matching game and a Word export.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod entry;
pub mod error;
pub mod event;
pub mod export;
pub mod gateway;
pub mod session;
pub mod store;
pub mod trace_init;
pub mod ui;
