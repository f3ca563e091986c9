use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, FromForm};
use crate::form::{ensure_at_least, require_text, FormValues, Validate, ValidationError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub cost: f64,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub cost: f64,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

const NAME_REQUIRED: &str = "O nome é obrigatório";
const PRICE_REQUIRED: &str = "O preço é obrigatório";
const PRICE_POSITIVE: &str = "O preço deve ser positivo";
const COST_REQUIRED: &str = "O custo é obrigatório";
const COST_NOT_NEGATIVE: &str = "O custo não pode ser negativo";

fn check_price(price: f64) -> Result<(), ValidationError> {
    ensure_at_least("price", price, 0.01, PRICE_POSITIVE)
}

fn check_cost(cost: f64) -> Result<(), ValidationError> {
    ensure_at_least("cost", cost, 0.0, COST_NOT_NEGATIVE)
}

impl Validate for ServiceDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, NAME_REQUIRED)?;
        check_price(self.price)?;
        check_cost(self.cost)
    }
}

impl Validate for ServicePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name, NAME_REQUIRED)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(cost) = self.cost {
            check_cost(cost)?;
        }
        Ok(())
    }
}

impl FromForm for ServiceDraft {
    fn from_form(values: &FormValues) -> Result<Self, ValidationError> {
        let draft = ServiceDraft {
            name: values.required("name", NAME_REQUIRED)?,
            description: values.text("description"),
            price: values.number("price", PRICE_REQUIRED)?,
            cost: values.number("cost", COST_REQUIRED)?,
            is_active: values.flag("isActive"),
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl From<ServiceDraft> for ServicePatch {
    fn from(draft: ServiceDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            price: Some(draft.price),
            cost: Some(draft.cost),
            is_active: Some(draft.is_active),
        }
    }
}

impl Entity for Service {
    const KIND: EntityKind = EntityKind::Service;
    type Draft = ServiceDraft;
    type Patch = ServicePatch;

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
            .with("description", self.description.clone())
            .with("price", self.price.to_string())
            .with("cost", self.cost.to_string())
            .with("isActive", self.is_active.to_string())
    }
}
