use serde::{Deserialize, Serialize};

use crate::form::{require_text, Validate, ValidationError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("username", &self.username, "O usuário é obrigatório")?;
        require_text("password", &self.password, "A senha é obrigatória")
    }
}

/// `data` of a successful login response; the token itself sits on the envelope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginUser {
    pub username: String,
    #[serde(default)]
    pub role: String,
}

/// Non-secret settings handed from the console server to the browser.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConsoleSettings {
    pub api_base_url: String,
    pub login_path: String,
    pub search_debounce_ms: u64,
    pub toast_ttl_ms: u64,
    pub default_page_size: u32,
    pub page_size_options: Vec<u32>,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/".into(),
            login_path: "api/auth/login".into(),
            search_debounce_ms: 500,
            toast_ttl_ms: 5000,
            default_page_size: 5,
            page_size_options: vec![5, 10, 25],
        }
    }
}
