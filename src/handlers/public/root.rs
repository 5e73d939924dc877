// handlers/public/root.rs - GET / handler

use axum::response::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "CareFull IQ API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "me": "/api/me",
            "logs": "/api/logs/list, /api/logs/save",
            "my_clients": "/api/assignments/my-clients",
            "caregivers": "/api/admin/caregivers/{list,invite,update} (admin)",
            "clients": "/api/admin/clients/{list,create,update} (admin)",
            "users": "/api/admin/users/{list,create,update,reset-password} (admin)",
            "assignments": "/api/admin/assignments/{list,set} (admin)",
        }
    }))
}
