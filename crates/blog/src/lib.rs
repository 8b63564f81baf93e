//! Blog account service library.
//!
//! Registration, login and JWT issuance for the blog backend, plus the HTTP
//! surface that exposes them.

pub mod account;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod notify;
pub mod user;
