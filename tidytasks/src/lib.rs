pub mod config;
pub mod store;
pub mod task;
pub mod web;
