use serde::{Deserialize, Serialize};

use crate::brand::Brand;
use crate::entity::{Entity, EntityKind, FromForm};
use crate::form::{ensure_at_least, require_text, FormValues, Validate, ValidationError};

/// Read model. The referenced brand comes back resolved.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost_price: f64,
    pub markup: f64,
    #[serde(default)]
    pub sale_price: f64,
    pub stock_quantity: i64,
    pub minimum_stock: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: Option<Brand>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.minimum_stock
    }
}

/// Write model. Sale price is derived server side; the brand travels as an id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub cost_price: f64,
    pub markup: f64,
    pub stock_quantity: i64,
    pub minimum_stock: i64,
    pub category: String,
    pub brand_id: Option<i64>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// `Some(None)` unlinks the brand and goes out as an explicit `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

const NAME_REQUIRED: &str = "O nome é obrigatório";
const COST_REQUIRED: &str = "Custo é obrigatório";
const MARKUP_REQUIRED: &str = "Markup é obrigatório";
const STOCK_REQUIRED: &str = "Estoque é obrigatório";
const MINIMUM_REQUIRED: &str = "Estoque mínimo é obrigatório";
const CATEGORY_REQUIRED: &str = "A categoria é obrigatória";
const NOT_NEGATIVE: &str = "O valor não pode ser negativo";

fn check_amounts(
    costPrice: Option<f64>,
    markup: Option<f64>,
    stockQuantity: Option<i64>,
    minimumStock: Option<i64>,
) -> Result<(), ValidationError> {
    let checks = [
        ("costPrice", costPrice),
        ("markup", markup),
        ("stockQuantity", stockQuantity.map(|v| v as f64)),
        ("minimumStock", minimumStock.map(|v| v as f64)),
    ];
    for (field, value) in checks {
        if let Some(value) = value {
            ensure_at_least(field, value, 0.0, NOT_NEGATIVE)?;
        }
    }
    Ok(())
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, NAME_REQUIRED)?;
        require_text("category", &self.category, CATEGORY_REQUIRED)?;
        check_amounts(
            Some(self.cost_price),
            Some(self.markup),
            Some(self.stock_quantity),
            Some(self.minimum_stock),
        )
    }
}

impl Validate for ProductPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name, NAME_REQUIRED)?;
        }
        if let Some(category) = &self.category {
            require_text("category", category, CATEGORY_REQUIRED)?;
        }
        check_amounts(
            self.cost_price,
            self.markup,
            self.stock_quantity,
            self.minimum_stock,
        )
    }
}

impl FromForm for ProductDraft {
    fn from_form(values: &FormValues) -> Result<Self, ValidationError> {
        let draft = ProductDraft {
            name: values.required("name", NAME_REQUIRED)?,
            description: values.text("description"),
            cost_price: values.number("costPrice", COST_REQUIRED)?,
            markup: values.number("markup", MARKUP_REQUIRED)?,
            stock_quantity: values.integer("stockQuantity", STOCK_REQUIRED)?,
            minimum_stock: values.integer("minimumStock", MINIMUM_REQUIRED)?,
            category: values.required("category", CATEGORY_REQUIRED)?,
            brand_id: values.optional_id("brandId")?,
            is_active: values.flag("isActive"),
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl From<ProductDraft> for ProductPatch {
    fn from(draft: ProductDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            cost_price: Some(draft.cost_price),
            markup: Some(draft.markup),
            stock_quantity: Some(draft.stock_quantity),
            minimum_stock: Some(draft.minimum_stock),
            category: Some(draft.category),
            // an edit form always states the brand, even when it is cleared
            brand_id: Some(draft.brand_id),
            is_active: Some(draft.is_active),
        }
    }
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;
    type Draft = ProductDraft;
    type Patch = ProductPatch;

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
        let brandId = self
            .brand
            .as_ref()
            .map(|b| b.id.to_string())
            .unwrap_or_default();

        FormValues::new()
            .with("name", self.name.clone())
            .with("description", self.description.clone())
            .with("costPrice", self.cost_price.to_string())
            .with("markup", self.markup.to_string())
            .with("stockQuantity", self.stock_quantity.to_string())
            .with("minimumStock", self.minimum_stock.to_string())
            .with("category", self.category.clone())
            .with("brandId", brandId)
            .with("isActive", self.is_active.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> FormValues {
        FormValues::new()
            .with("name", "Lente")
            .with("costPrice", "40")
            .with("markup", "50")
            .with("stockQuantity", "3")
            .with("minimumStock", "5")
            .with("category", "Óptica")
            .with("brandId", "2")
            .with("isActive", "true")
    }

    #[test]
    fn draft_carries_brand_reference_by_id() {
        let draft = ProductDraft::from_form(&valid_form()).unwrap();
        assert_eq!(draft.brand_id, Some(2));
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["brandId"], 2);
        assert!(json.get("brand").is_none());
    }

    #[test]
    fn negative_stock_is_rejected() {
        let form = valid_form().with("stockQuantity", "-1");
        let err = ProductDraft::from_form(&form).unwrap_err();
        assert_eq!(err.field, "stockQuantity");
    }

    #[test]
    fn category_is_required() {
        let form = valid_form().with("category", "");
        assert_eq!(ProductDraft::from_form(&form).unwrap_err().message, CATEGORY_REQUIRED);
    }

    #[test]
    fn patch_from_form_sends_cleared_brand_as_null() {
        let form = valid_form().with("brandId", "");
        let patch = ProductPatch::from(ProductDraft::from_form(&form).unwrap());
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json.get("brandId"), Some(&serde_json::Value::Null));

        let linked = ProductPatch::from(ProductDraft::from_form(&valid_form()).unwrap());
        assert_eq!(serde_json::to_value(&linked).unwrap()["brandId"], 2);
    }

    #[test]
    fn untouched_patch_leaves_brand_out() {
        let patch = ProductPatch {
            markup: Some(30.0),
            ..ProductPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert!(json.get("brandId").is_none());
        assert_eq!(json["markup"], 30.0);
    }

    #[test]
    fn read_model_embeds_brand() {
        let raw = r#"{
            "id": 1, "name": "Lente", "description": "", "costPrice": 40.0, "markup": 50.0,
            "salePrice": 60.0, "stockQuantity": 3, "minimumStock": 5, "category": "Óptica",
            "brand": { "id": 2, "name": "Acme", "isActive": true }, "isActive": true
        }"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.brand.as_ref().map(|b| b.name.as_str()), Some("Acme"));
        assert!(product.is_low_stock());
        assert_eq!(product.to_form().get("brandId"), "2");
    }
}
