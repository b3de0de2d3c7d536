pub mod account;
pub mod analysis;
pub mod app_data;
pub mod config;
pub mod contributions;
pub mod controllers;
pub mod database;
pub mod error;
pub mod github;
pub mod languages;
pub mod routes;
pub mod skills;
