pub mod comparator;
pub mod config;
pub mod domain;
pub mod modules;
pub mod table;
