//! Historico module: three-layer architecture (domain, repository, service).
//!
//! `repository::RecordStore` is the seam between validation and persistence;
//! `repo` holds the relational and document implementations.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use repository::RecordStore;
pub use service::HistoricoService;
