// API response body types

use serde::Serialize;

use crate::upload::StoredUpload;

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}

/// Body returned after a stored upload
#[derive(Debug, Serialize)]
pub struct UploadResponse<'a> {
    pub success: bool,
    pub file: &'a StoredUpload,
}

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub error: &'a str,
}
