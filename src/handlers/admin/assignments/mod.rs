// handlers/admin/assignments/mod.rs - Caregiver/client assignment handlers

pub mod list; // GET /api/admin/assignments/list?client_id=
pub mod set; // POST /api/admin/assignments/set

pub use list::assignments_list;
pub use set::assignments_set;
