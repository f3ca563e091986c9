use std::collections::BTreeMap;

/// Client-side rejection of a form, raised before anything is dispatched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Raw string values of a form keyed by wire field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(|v| v.trim()).unwrap_or("")
    }

    pub fn required(&self, field: &'static str, message: &str) -> Result<String, ValidationError> {
        let value = self.get(field);
        if value.is_empty() {
            return Err(ValidationError::new(field, message));
        }
        Ok(value.to_string())
    }

    pub fn optional(&self, field: &str) -> Option<String> {
        let value = self.get(field);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn text(&self, field: &str) -> String {
        self.get(field).to_string()
    }

    /// Accepts both `12.5` and the comma decimal separator `12,5`.
    pub fn number(&self, field: &'static str, message: &str) -> Result<f64, ValidationError> {
        let raw = self.required(field, message)?.replace(',', ".");
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ValidationError::new(field, "Informe um número válido"))
    }

    pub fn integer(&self, field: &'static str, message: &str) -> Result<i64, ValidationError> {
        let raw = self.required(field, message)?;
        raw.parse::<i64>()
            .map_err(|_| ValidationError::new(field, "Informe um número inteiro"))
    }

    pub fn optional_id(&self, field: &'static str) -> Result<Option<i64>, ValidationError> {
        match self.optional(field) {
            None => Ok(None),
            Some(raw) => match raw.parse::<i64>() {
                Ok(0) => Ok(None),
                Ok(id) => Ok(Some(id)),
                Err(_) => Err(ValidationError::new(field, "Seleção inválida")),
            },
        }
    }

    pub fn flag(&self, field: &str) -> bool {
        matches!(self.get(field), "true" | "on" | "1")
    }
}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    message: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}

pub(crate) fn ensure_at_least(
    field: &'static str,
    value: f64,
    min: f64,
    message: &str,
) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}
