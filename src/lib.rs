//! Formflow - Blueprint-Driven Conversational Form Filling
//!
//! This crate implements a multi-turn conversation engine that collects
//! structured data one question at a time, driven by declarative YAML
//! service blueprints.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
