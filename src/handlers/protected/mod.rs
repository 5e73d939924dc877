// handlers/protected/mod.rs - Endpoints open to any active family member
//
// Admins and caregivers both pass; handlers branch on `CallerContext::role`.

pub mod assignments; // /api/assignments/*
pub mod logs; // /api/logs/*
pub mod me; // GET /api/me

pub use me::me;
