//! Core types for Section Factory.
//!
//! This module provides the catalog's domain records and type-safe wrappers
//! for the values they carry.

pub mod category;
pub mod id;
pub mod installation;
pub mod price;
pub mod section;
pub mod shop_domain;
pub mod user;
pub mod validation;

pub use category::{ALL_CATEGORIES, CategoryFilter, KNOWN_CATEGORIES, is_known_category};
pub use id::*;
pub use installation::Installation;
pub use price::{AmountError, Price, Rating};
pub use section::{NewSection, Section, SectionDraft};
pub use shop_domain::{ShopDomain, ShopDomainError};
pub use user::{User, Username, UsernameError};
pub use validation::{FieldError, ValidationError};
