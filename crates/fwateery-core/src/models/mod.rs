//! Data models for invoices, assistant chat and configuration.

pub mod chat;
pub mod config;
pub mod invoice;
pub mod language;
