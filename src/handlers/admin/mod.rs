// handlers/admin/mod.rs - Admin-only endpoints (/api/admin/*)
//
// Every handler here takes an `AdminContext`, so inactive admins and
// caregivers are turned away before the handler body runs.

pub mod assignments;
pub mod caregivers;
pub mod clients;
pub mod users;
