//! Library crate for color-memory-back, exposing modules for binaries and integration tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod i18n;
pub mod routes;
pub mod services;
pub mod state;
