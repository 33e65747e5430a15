//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate slot persistence into note use-case APIs.
//! - Keep hosts decoupled from storage details.

pub mod note_store;
