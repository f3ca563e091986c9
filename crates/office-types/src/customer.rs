use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, FromForm};
use crate::form::{require_text, FormValues, Validate, ValidationError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub born_date: Option<String>,
    #[serde(default)]
    pub phone01: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub cpf: Option<String>,
    pub born_date: Option<String>,
    pub phone01: Option<String>,
    pub email: Option<String>,
    pub cep: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub city: Option<String>,
    pub uf: Option<String>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional contact and address fields: `Some(None)` clears the value
    /// and is sent as an explicit `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub born_date: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone01: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uf: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

const NAME_REQUIRED: &str = "O nome é obrigatório";

fn check_email(email: Option<&str>) -> Result<(), ValidationError> {
    match email {
        Some(email) if !email.contains('@') => {
            Err(ValidationError::new("email", "Email inválido"))
        }
        _ => Ok(()),
    }
}

impl Validate for CustomerDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, NAME_REQUIRED)?;
        check_email(self.email.as_deref())
    }
}

impl Validate for CustomerPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name, NAME_REQUIRED)?;
        }
        check_email(self.email.as_ref().and_then(Option::as_deref))
    }
}

impl FromForm for CustomerDraft {
    fn from_form(values: &FormValues) -> Result<Self, ValidationError> {
        let draft = CustomerDraft {
            name: values.required("name", NAME_REQUIRED)?,
            cpf: values.optional("cpf"),
            born_date: values.optional("bornDate"),
            phone01: values.optional("phone01"),
            email: values.optional("email"),
            cep: values.optional("cep"),
            street: values.optional("street"),
            number: values.optional("number"),
            city: values.optional("city"),
            uf: values.optional("uf").map(|uf| uf.to_uppercase()),
            is_active: values.flag("isActive"),
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl From<CustomerDraft> for CustomerPatch {
    /// Built from a full edit form, so every field is stated and blanks clear.
    fn from(draft: CustomerDraft) -> Self {
        Self {
            name: Some(draft.name),
            cpf: Some(draft.cpf),
            born_date: Some(draft.born_date),
            phone01: Some(draft.phone01),
            email: Some(draft.email),
            cep: Some(draft.cep),
            street: Some(draft.street),
            number: Some(draft.number),
            city: Some(draft.city),
            uf: Some(draft.uf),
            is_active: Some(draft.is_active),
        }
    }
}

impl Entity for Customer {
    const KIND: EntityKind = EntityKind::Customer;
    type Draft = CustomerDraft;
    type Patch = CustomerPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn to_form(&self) -> FormValues {
        let optionals = [
            ("cpf", &self.cpf),
            ("bornDate", &self.born_date),
            ("phone01", &self.phone01),
            ("email", &self.email),
            ("cep", &self.cep),
            ("street", &self.street),
            ("number", &self.number),
            ("city", &self.city),
            ("uf", &self.uf),
        ];

        let mut form = FormValues::new()
            .with("name", self.name.clone())
            .with("isActive", self.is_active.to_string());
        for (field, value) in optionals {
            form.set(field, value.clone().unwrap_or_default());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optionals_become_none() {
        let form = FormValues::new()
            .with("name", "Maria Silva")
            .with("cpf", "")
            .with("uf", "sp")
            .with("isActive", "true");
        let draft = CustomerDraft::from_form(&form).unwrap();
        assert_eq!(draft.cpf, None);
        assert_eq!(draft.uf.as_deref(), Some("SP"));
        assert!(draft.is_active);
    }

    #[test]
    fn email_must_look_like_one() {
        let form = FormValues::new()
            .with("name", "Maria Silva")
            .with("email", "maria.example.com");
        assert_eq!(CustomerDraft::from_form(&form).unwrap_err().field, "email");
    }

    #[test]
    fn edit_form_clears_blanked_fields() {
        let form = FormValues::new()
            .with("name", "Maria Silva")
            .with("email", "")
            .with("city", "Campinas")
            .with("isActive", "true");
        let patch = CustomerPatch::from(CustomerDraft::from_form(&form).unwrap());
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json.get("email"), Some(&serde_json::Value::Null));
        assert_eq!(json.get("cpf"), Some(&serde_json::Value::Null));
        assert_eq!(json["city"], "Campinas");
    }

    #[test]
    fn patch_still_checks_email_shape() {
        let patch = CustomerPatch {
            email: Some(Some("maria.example.com".into())),
            ..CustomerPatch::default()
        };
        assert_eq!(patch.validate().unwrap_err().field, "email");
        assert!(CustomerPatch::default().validate().is_ok());
    }

    #[test]
    fn record_tolerates_missing_optionals() {
        let raw = r#"{ "id": 5, "name": "João", "isActive": false }"#;
        let customer: Customer = serde_json::from_str(raw).unwrap();
        assert_eq!(customer.city, None);
        assert_eq!(customer.to_form().get("city"), "");
    }
}
