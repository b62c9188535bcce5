pub mod config;
pub mod controller;
pub mod date_ranges;
pub mod debounce;
pub mod planner;
pub mod reconcile;
pub mod selection;
