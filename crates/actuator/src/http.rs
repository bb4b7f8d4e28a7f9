use crate::status::Status;
use std::collections::HashMap;

pub const SERVICE_UNAVAILABLE: u16 = 503;
pub const OK: u16 = 200;

/// Maps a health status to the HTTP code of the health endpoint.
#[derive(Debug, Clone)]
pub struct HttpCodeStatusMapper {
    mappings: HashMap<String, u16>,
}

impl HttpCodeStatusMapper {
    pub fn new() -> Self {
        let mut mappings = HashMap::new();
        mappings.insert(Status::DOWN.code().to_string(), SERVICE_UNAVAILABLE);
        mappings.insert(Status::OUT_OF_SERVICE.code().to_string(), SERVICE_UNAVAILABLE);
        Self { mappings }
    }

    /// Override or add the code used for `status`.
    pub fn with_mapping(mut self, status: &str, code: u16) -> Self {
        self.mappings.insert(status.trim().to_uppercase(), code);
        self
    }

    pub fn status_code(&self, status: &Status) -> u16 {
        self.mappings.get(status.code()).copied().unwrap_or(OK)
    }
}

impl Default for HttpCodeStatusMapper {
    fn default() -> Self {
        Self::new()
    }
}
