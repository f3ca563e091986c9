use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::form::{FormValues, Validate, ValidationError};

/// The four collections managed by the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Brand,
    Customer,
    Product,
    Service,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Brand,
        EntityKind::Customer,
        EntityKind::Product,
        EntityKind::Service,
    ];

    /// Collection path relative to the API base. Every operation on a kind
    /// goes through this one path, including customer updates.
    pub fn collection_path(self) -> &'static str {
        match self {
            EntityKind::Brand => "api/brands",
            EntityKind::Customer => "api/clients",
            EntityKind::Product => "api/products",
            EntityKind::Service => "api/services",
        }
    }

    pub fn item_path(self, id: i64) -> String {
        format!("{}/{id}", self.collection_path())
    }

    pub fn slug(self) -> &'static str {
        match self {
            EntityKind::Brand => "brands",
            EntityKind::Customer => "customers",
            EntityKind::Product => "products",
            EntityKind::Service => "services",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            EntityKind::Brand => "Marcas",
            EntityKind::Customer => "Clientes",
            EntityKind::Product => "Produtos",
            EntityKind::Service => "Serviços",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            EntityKind::Brand => "marca",
            EntityKind::Customer => "cliente",
            EntityKind::Product => "produto",
            EntityKind::Service => "serviço",
        }
    }

    fn is_feminine(self) -> bool {
        matches!(self, EntityKind::Brand)
    }

    pub fn success_message(self, mutation: Mutation) -> String {
        let ending = if self.is_feminine() { "a" } else { "o" };
        let verb = match mutation {
            Mutation::Create => "criad",
            Mutation::Update => "atualizad",
            Mutation::Delete => "excluíd",
        };
        format!("{} {verb}{ending} com sucesso!", capitalize(self.noun()))
    }

    pub fn failure_message(self, mutation: Mutation) -> String {
        let verb = match mutation {
            Mutation::Create => "criar",
            Mutation::Update => "atualizar",
            Mutation::Delete => "excluir",
        };
        format!("Erro ao {verb} {}.", self.noun())
    }

    pub fn load_failure_message(self) -> String {
        let article = if self.is_feminine() { "as" } else { "os" };
        format!(
            "Ocorreu um erro ao buscar {article} {}",
            self.title().to_lowercase()
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A record managed through the generic resource façade.
///
/// `Draft` is the create payload, `Patch` the update payload. Both are
/// parsed from raw form values and validated before dispatch.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;

    type Draft: Clone + fmt::Debug + Serialize + Validate + FromForm + Send + Sync + 'static;
    type Patch: Clone
        + fmt::Debug
        + Serialize
        + Validate
        + From<Self::Draft>
        + Send
        + Sync
        + 'static;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn is_active(&self) -> bool;

    /// Current values in the shape the edit form expects.
    fn to_form(&self) -> FormValues;
}

pub trait FromForm: Sized {
    fn from_form(values: &FormValues) -> Result<Self, ValidationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_messages_agree_in_gender() {
        assert_eq!(
            EntityKind::Brand.success_message(Mutation::Create),
            "Marca criada com sucesso!"
        );
        assert_eq!(
            EntityKind::Service.success_message(Mutation::Delete),
            "Serviço excluído com sucesso!"
        );
        assert_eq!(
            EntityKind::Brand.failure_message(Mutation::Create),
            "Erro ao criar marca."
        );
        assert_eq!(
            EntityKind::Customer.failure_message(Mutation::Update),
            "Erro ao atualizar cliente."
        );
        assert_eq!(
            EntityKind::Brand.load_failure_message(),
            "Ocorreu um erro ao buscar as marcas"
        );
    }

    #[test]
    fn customer_paths_use_one_spelling() {
        assert_eq!(EntityKind::Customer.collection_path(), "api/clients");
        assert_eq!(EntityKind::Customer.item_path(12), "api/clients/12");
    }
}
