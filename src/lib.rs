//! Person Registry API Library
//!
//! This library provides the core functionality of the person registry API:
//! CRUD over person records keyed by CPF, backed by Postgres, plus an address
//! lookup by CEP through an external API.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Domain models, mapping, and errors.
//! - `data`: Data access layer.
//! - `integrations`: External service integrations.
//! - `cep_client`: CEP API client.
//! - `config`: Configuration management.
//! - `db`: Database connection pool and schema.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Records, request and response types, validation.
//! - `openapi`: OpenAPI document and Swagger UI.
//! - `routes`: Router assembly.
//! - `storage`: Person persistence.
//! - `views`: Record to response mapping.

pub mod api;
pub mod core;
pub mod data;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod cep_client;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod storage;
pub mod views;
