// handlers/admin/caregivers/mod.rs - Caregiver roster handlers

pub mod invite; // POST /api/admin/caregivers/invite
pub mod list; // GET /api/admin/caregivers/list
pub mod update; // PATCH /api/admin/caregivers/update

pub use invite::caregivers_invite;
pub use list::caregivers_list;
pub use update::caregivers_update;
