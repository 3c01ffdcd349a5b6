//! Integrations with external services

pub mod integrations;
