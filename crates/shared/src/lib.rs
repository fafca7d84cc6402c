//! Shared utilities and common types for the dinner pairing backend.
//!
//! This crate provides common validation logic for calendar dates.

pub mod validation;
