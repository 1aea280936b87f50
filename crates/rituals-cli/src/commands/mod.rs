pub mod config;
pub mod data;
pub mod ritual;
pub mod run;
