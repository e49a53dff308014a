pub mod activity;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod precipitation;
pub mod routes;
pub mod service;
pub mod stats;
pub mod validation;
