pub mod compute;
pub mod config;
pub mod cooldown;
pub mod draw;
pub mod driver;
pub mod entities;
pub mod error;
pub mod files;
pub mod input;
pub mod lane;
pub mod logging;
pub mod screen;
pub mod settings;
pub mod state;
pub mod wallet;
