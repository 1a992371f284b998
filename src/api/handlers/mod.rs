pub mod admin;
pub mod analytics;
pub mod balance;
pub mod health;
pub mod metrics;
pub mod prefs;
pub mod subscription;
pub mod trades;

use serde::Serialize;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}
