//! Example domain model
//!
//! The toy classes the bundled demo application is about: people and
//! organizations, a store with products, catalogs and orders, and a small
//! animal taxonomy. They exist to have something realistic to bundle and to
//! demonstrate validation and error-handling styles.

mod error;
mod people;
mod store;
mod zoo;

pub use error::{DomainError, DomainResult};
pub use people::{BusinessType, OrgKind, Organization, Person};
pub use store::{
    format_amount, Catalog, Currency, LineItem, Order, OrderFactory, PhoneNumber, Price, Product,
    ProductFactory, ProductKind, Sequence, Size,
};
pub use zoo::{menagerie, Animal, Cat, Dog, Hawk, Snake};
