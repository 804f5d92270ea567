// ABOUTME: Library crate for pgmi-wizard exposing the wizards, runtime, and models for testing and embedding

#![allow(missing_docs)]

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod models;
