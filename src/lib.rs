pub mod catalog;
pub mod coach;
pub mod db;
pub mod models;
pub mod plan;
pub mod session;
pub mod storage;
pub mod types;
pub mod utils;
