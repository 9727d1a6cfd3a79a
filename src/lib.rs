//! Omnirender: render and validate templated omnibus configuration files.
//!
//! A [`template::Template`] is filled from a [`context::Context`], optionally
//! checked against a [`schema::Schema`], and written atomically by
//! [`render::Renderer`]. The `cli` and `commands` modules wire this up to the
//! `omnirender` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod logging;
pub mod render;
pub mod schema;
pub mod template;

#[cfg(test)]
mod test_support;
