pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod occurrence;
pub mod output;
pub mod recurrence;
pub mod schedule;
pub mod store;
pub mod view;
