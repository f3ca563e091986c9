#![allow(non_snake_case)]

pub mod auth;
pub mod brand;
pub mod customer;
pub mod entity;
pub mod envelope;
pub mod form;
pub mod product;
pub mod query;
pub mod service;

pub use auth::*;
pub use brand::*;
pub use customer::*;
pub use entity::*;
pub use envelope::*;
pub use form::{FormValues, Validate, ValidationError};
pub use product::*;
pub use query::ListQuery;
pub use service::*;
