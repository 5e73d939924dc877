// handlers/admin/users/mod.rs - Admin account handlers

pub mod create; // POST /api/admin/users/create
pub mod list; // GET /api/admin/users/list
pub mod reset_password; // POST /api/admin/users/reset-password
pub mod update; // PATCH /api/admin/users/update

pub use create::users_create;
pub use list::users_list;
pub use reset_password::users_reset_password;
pub use update::users_update;
