pub mod backup_exchange;
pub mod core;
pub mod resources;
pub mod schedules;
pub mod setup;
