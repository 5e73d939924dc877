pub mod auth;
pub mod extract;
pub mod gate;
pub mod response;

pub use auth::authenticate;
pub use extract::{ApiJson, ApiQuery};
pub use gate::{AdminContext, Caller, CallerContext};
pub use response::{ApiResponse, ApiResult};
