pub mod assignment_service;
pub mod caregiver_service;
pub mod client_service;
pub mod log_service;
pub mod user_service;
pub mod validate;

pub use assignment_service::AssignmentService;
pub use caregiver_service::CaregiverService;
pub use client_service::ClientService;
pub use log_service::LogService;
pub use user_service::UserService;
