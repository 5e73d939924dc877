// handlers/admin/clients/mod.rs - Client record handlers

pub mod create; // POST /api/admin/clients/create
pub mod list; // GET /api/admin/clients/list
pub mod update; // PATCH /api/admin/clients/update

pub use create::clients_create;
pub use list::clients_list;
pub use update::clients_update;
