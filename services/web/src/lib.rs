pub mod actions;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod infra;
pub mod router;
pub mod state;
pub mod usecase;
