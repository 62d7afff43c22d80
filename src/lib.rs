pub mod db;
pub mod error;
pub mod model;
pub mod repo;
pub mod server;
pub mod service;
