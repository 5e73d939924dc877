// handlers/protected/assignments/mod.rs - Assignment views for the caller

pub mod my_clients; // GET /api/assignments/my-clients

pub use my_clients::my_clients;
