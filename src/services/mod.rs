//! Application services.
//!
//! Logic that spans the database and the planner, kept out of the
//! HTTP handlers so it can be driven and tested on its own.

pub mod planning;
