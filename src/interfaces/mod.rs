//! Abstract interfaces for doisync collaborators.
//!
//! These traits define the contracts for:
//! - The local record store (DOIs, datasets, downloads, users)
//! - The external registration authority
//! - The lifecycle handler invoked by repairs
//! - The issuer policy deciding which DOIs are ours

pub mod authority;
pub mod identifier_store;
pub mod lifecycle;

pub use authority::{Authority, AuthorityError, Resolution};
pub use identifier_store::{IdentifierStore, Page, StoreError};
pub use lifecycle::{IssuerPolicy, LifecycleError, LifecycleHandler};
