// ABOUTME: Core data models for connection settings produced by the wizards

pub mod connection;

pub use connection::{
    AuthMethod, ConnectionConfig, ConnectionResult, CONNECTION_STRING_PARAM, DEFAULT_HOST,
    DEFAULT_MANAGEMENT_DB, DEFAULT_PORT, DEFAULT_USERNAME,
};
