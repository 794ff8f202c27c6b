//! Case-study authoring core.
//!
//! A case study is a list of sections, each holding typed objectives and
//! deliverables, plus one markdown document whose headings carry stable
//! identifiers. Objectives link to headings through a relation table kept
//! consistent by every transition.
//!
//! All changes go through [`reducer::reduce`], a pure function from the
//! current [`types::AppState`] and an [`action::Action`] to the next state.
//! The [`store::Store`] owns the current value; [`persistence`] loads and
//! saves it; [`selectors`] derive read-only views.

pub mod action;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod headings;
pub mod ids;
pub mod links;
pub mod logging;
pub mod persistence;
pub mod reducer;
pub mod selectors;
pub mod store;
pub mod templates;
pub mod types;
pub mod validate;

pub use action::Action;
pub use error::Error;
pub use store::Store;
pub use types::AppState;
