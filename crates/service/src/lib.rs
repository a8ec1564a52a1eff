//! Service layer for historico records.
//! - `historico` holds the domain types, the `RecordStore` abstraction and its backends.
//! - `storage` holds the generic JSON file store the document backend is built on.
//! - Validation lives here so every backend sees only well-formed input.

pub mod errors;
pub mod historico;
pub mod storage;
