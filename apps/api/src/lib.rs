pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod mail;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod store;
