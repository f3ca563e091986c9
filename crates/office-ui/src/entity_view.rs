use std::sync::Arc;

use office_types::{Brand, Customer, Entity, FormValues, Product, Service};

use crate::services::{EntityResource, Services};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    TextArea,
    Email,
    Date,
    Money,
    Integer,
    Status,
    BrandSelect,
}

/// One form control, keyed by its wire field name.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
}

const fn field(key: &'static str, label: &'static str, input: FieldInput) -> FieldSpec {
    FieldSpec { key, label, input }
}

/// How a record kind shows up on its CRUD screen.
pub trait EntityView: Entity {
    const NEW_TITLE: &'static str;
    const EDIT_TITLE: &'static str;
    const DETAILS_TITLE: &'static str;
    const EMPTY: &'static str;
    const FIELDS: &'static [FieldSpec];
    /// Headers of the columns between the name and the status chip.
    const COLUMNS: &'static [&'static str];

    fn resource(services: &Services) -> Arc<EntityResource<Self>>;

    fn cells(&self) -> Vec<String>;

    fn details(&self) -> Vec<(&'static str, String)>;

    fn blank_form() -> FormValues {
        FormValues::new().with("isActive", "true")
    }
}

/// `R$ 1.234,56`
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{:02}", cents % 100)
}

fn or_dash(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or("\u{2014}")
        .to_string()
}

pub fn status_label(isActive: bool) -> &'static str {
    if isActive {
        "Ativo"
    } else {
        "Inativo"
    }
}

impl EntityView for Brand {
    const NEW_TITLE: &'static str = "Nova Marca";
    const EDIT_TITLE: &'static str = "Editar Marca";
    const DETAILS_TITLE: &'static str = "Detalhes da Marca";
    const EMPTY: &'static str = "Nenhuma marca encontrada.";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Nome da Marca", FieldInput::Text),
        field("isActive", "Status", FieldInput::Status),
    ];
    const COLUMNS: &'static [&'static str] = &[];

    fn resource(services: &Services) -> Arc<EntityResource<Self>> {
        services.brands.clone()
    }

    fn cells(&self) -> Vec<String> {
        Vec::new()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Nome", self.name.clone()),
            ("Status", status_label(self.is_active).into()),
        ]
    }
}

impl EntityView for Customer {
    const NEW_TITLE: &'static str = "Novo Cliente";
    const EDIT_TITLE: &'static str = "Editar Cliente";
    const DETAILS_TITLE: &'static str = "Detalhes do Cliente";
    const EMPTY: &'static str = "Nenhum cliente encontrado.";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Nome", FieldInput::Text),
        field("cpf", "CPF", FieldInput::Text),
        field("bornDate", "Data de Nascimento", FieldInput::Date),
        field("phone01", "Telefone Principal", FieldInput::Text),
        field("email", "E-mail", FieldInput::Email),
        field("cep", "CEP", FieldInput::Text),
        field("street", "Rua", FieldInput::Text),
        field("number", "Número", FieldInput::Text),
        field("city", "Cidade", FieldInput::Text),
        field("uf", "UF", FieldInput::Text),
        field("isActive", "Status", FieldInput::Status),
    ];
    const COLUMNS: &'static [&'static str] = &["CPF", "Telefone Principal", "Cidade"];

    fn resource(services: &Services) -> Arc<EntityResource<Self>> {
        services.customers.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![or_dash(&self.cpf), or_dash(&self.phone01), or_dash(&self.city)]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let address = [&self.street, &self.number, &self.city, &self.uf]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            ("ID", self.id.to_string()),
            ("Nome", self.name.clone()),
            ("CPF", or_dash(&self.cpf)),
            ("Data de Nascimento", or_dash(&self.born_date)),
            ("Telefone", or_dash(&self.phone01)),
            ("E-mail", or_dash(&self.email)),
            ("CEP", or_dash(&self.cep)),
            ("Endereço", or_dash(&Some(address))),
            ("Status", status_label(self.is_active).into()),
            ("Criado em", or_dash(&self.created_at)),
            ("Atualizado em", or_dash(&self.updated_at)),
        ]
    }
}

impl EntityView for Product {
    const NEW_TITLE: &'static str = "Novo Produto";
    const EDIT_TITLE: &'static str = "Editar Produto";
    const DETAILS_TITLE: &'static str = "Detalhes do Produto";
    const EMPTY: &'static str = "Nenhum produto encontrado.";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Nome do Produto", FieldInput::Text),
        field("description", "Descrição", FieldInput::TextArea),
        field("costPrice", "Preço de Custo", FieldInput::Money),
        field("markup", "Markup (%)", FieldInput::Money),
        field("stockQuantity", "Estoque Atual", FieldInput::Integer),
        field("minimumStock", "Estoque Mínimo", FieldInput::Integer),
        field("category", "Categoria", FieldInput::Text),
        field("brandId", "Marca", FieldInput::BrandSelect),
        field("isActive", "Status", FieldInput::Status),
    ];
    const COLUMNS: &'static [&'static str] = &["Marca", "Preço de Venda", "Estoque"];

    fn resource(services: &Services) -> Arc<EntityResource<Self>> {
        services.products.clone()
    }

    fn cells(&self) -> Vec<String> {
        let stock = if self.is_low_stock() {
            format!("{} (baixo)", self.stock_quantity)
        } else {
            self.stock_quantity.to_string()
        };
        vec![
            or_dash(&self.brand.as_ref().map(|b| b.name.clone())),
            format_currency(self.sale_price),
            stock,
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Nome", self.name.clone()),
            ("Descrição", or_dash(&Some(self.description.clone()))),
            ("Categoria", self.category.clone()),
            ("Marca", or_dash(&self.brand.as_ref().map(|b| b.name.clone()))),
            ("Preço de Custo", format_currency(self.cost_price)),
            ("Markup", format!("{}%", self.markup)),
            ("Preço de Venda", format_currency(self.sale_price)),
            ("Estoque Atual", self.stock_quantity.to_string()),
            ("Estoque Mínimo", self.minimum_stock.to_string()),
            ("Status", status_label(self.is_active).into()),
            ("Criado em", or_dash(&self.created_at)),
            ("Atualizado em", or_dash(&self.updated_at)),
        ]
    }
}

impl EntityView for Service {
    const NEW_TITLE: &'static str = "Novo Serviço";
    const EDIT_TITLE: &'static str = "Editar Serviço";
    const DETAILS_TITLE: &'static str = "Detalhes do Serviço";
    const EMPTY: &'static str = "Nenhum serviço encontrado.";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Nome do Serviço", FieldInput::Text),
        field("description", "Descrição", FieldInput::TextArea),
        field("price", "Preço", FieldInput::Money),
        field("cost", "Custo", FieldInput::Money),
        field("isActive", "Status", FieldInput::Status),
    ];
    const COLUMNS: &'static [&'static str] = &["Preço", "Custo"];

    fn resource(services: &Services) -> Arc<EntityResource<Self>> {
        services.services.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![format_currency(self.price), format_currency(self.cost)]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Nome", self.name.clone()),
            ("Descrição", or_dash(&Some(self.description.clone()))),
            ("Preço", format_currency(self.price)),
            ("Custo", format_currency(self.cost)),
            ("Status", status_label(self.is_active).into()),
            ("Criado em", or_dash(&self.created_at)),
            ("Atualizado em", or_dash(&self.updated_at)),
        ]
    }
}
