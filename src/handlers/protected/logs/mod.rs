// handlers/protected/logs/mod.rs - Daily log handlers

pub mod list; // GET /api/logs/list
pub mod save; // POST /api/logs/save

pub use list::logs_list;
pub use save::logs_save;
