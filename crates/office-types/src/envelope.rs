use serde::{Deserialize, Serialize};

/// Envelope wrapped around every backend response.
///
/// `data` is absent on most error responses and on some deletes. `token`
/// only appears on the login response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub path: String,
}

/// Error body shape. Only the message is needed to report a failure.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: String,
}

/// One page of a server-side paginated listing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            current_page: 0,
            total_pages: 0,
            total_elements: 0,
            content: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Body of a successful delete, when the backend echoes the removed record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DeleteResult<T> {
    pub result: T,
}
