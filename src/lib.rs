pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod planner;
pub mod services;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod testing;
