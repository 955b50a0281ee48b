//! Domain layer for the complaint desk.
//!
//! Holds the fixed category catalog and the in-memory complaint store. Nothing
//! here performs I/O; the HTTP surface lives in the app crate.

pub mod catalog;
pub mod error;
pub mod store;
pub mod types;

pub use catalog::CategoryCatalog;
pub use error::{StoreError, ValidationError};
pub use store::{Clock, ComplaintStore};
pub use types::{Category, Complaint, ComplaintStatus, NewComplaint, SUBMITTER_PLACEHOLDER};
