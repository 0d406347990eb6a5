pub mod clock;
pub mod config;
pub mod difficulty;
pub mod events;
pub mod judge;
pub mod levels;
pub mod session;
pub mod spawner;
pub mod store;
pub mod types;
