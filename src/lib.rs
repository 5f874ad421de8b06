pub mod api;
pub mod config;
pub mod control;
pub mod draft;
pub mod drawing;
pub mod export;
pub mod import;
pub mod stats;
pub mod submit;
pub mod types;
pub mod util;
