use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, FromForm};
use crate::form::{require_text, FormValues, Validate, ValidationError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrandDraft {
    pub name: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrandPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

const NAME_REQUIRED: &str = "O nome da marca é obrigatório";

impl Validate for BrandDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, NAME_REQUIRED)
    }
}

impl Validate for BrandPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => require_text("name", name, NAME_REQUIRED),
            None => Ok(()),
        }
    }
}

impl FromForm for BrandDraft {
    fn from_form(values: &FormValues) -> Result<Self, ValidationError> {
        let draft = BrandDraft {
            name: values.required("name", NAME_REQUIRED)?,
            is_active: values.flag("isActive"),
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl From<BrandDraft> for BrandPatch {
    fn from(draft: BrandDraft) -> Self {
        Self {
            name: Some(draft.name),
            is_active: Some(draft.is_active),
        }
    }
}

impl Entity for Brand {
    const KIND: EntityKind = EntityKind::Brand;
    type Draft = BrandDraft;
    type Patch = BrandPatch;

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
        FormValues::new()
            .with("name", self.name.clone())
            .with("isActive", self.is_active.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_requires_name() {
        let form = FormValues::new().with("name", " ").with("isActive", "true");
        let err = BrandDraft::from_form(&form).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = BrandPatch {
            name: None,
            is_active: Some(false),
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"isActive":false}"#);
    }

    #[test]
    fn edit_form_round_trips_into_patch() {
        let brand = Brand {
            id: 3,
            name: "Acme".into(),
            is_active: true,
        };
        let draft = BrandDraft::from_form(&brand.to_form()).unwrap();
        let patch = BrandPatch::from(draft);
        assert_eq!(patch.name.as_deref(), Some("Acme"));
        assert_eq!(patch.is_active, Some(true));
    }
}
