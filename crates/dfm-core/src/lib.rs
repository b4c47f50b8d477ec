//! DFM Core Types and Definitions
//!
//! This crate provides the foundational types for Dimensional Fact Model
//! diagrams. It includes:
//!
//! - **Attributes**: Ordered visual attribute sets ([`attributes::Attributes`])
//! - **Presets**: Default attribute templates per element kind ([`preset::Presets`])
//! - **Facts**: The central measure table of a star schema ([`fact::Fact`])

pub mod attributes;
pub mod fact;
pub mod preset;
