// Client library for FitFam workout partners: backend access, partner
// statistics cache and session state

pub mod backend;
pub mod comparison;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod streak;

pub use error::{FitFamError, Result};
