pub mod confirm;
pub mod details;
pub mod entity_form;
pub mod modal;
pub mod nav;
pub mod pagination;
pub mod protected;
pub mod search;
pub mod toast;
