//! ---
//! lic_section: "01-core-functionality"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Shared configuration, logging and license loading."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
//! Shared primitives for R-LIC tooling: TOML configuration, tracing setup and
//! helpers that turn license documents on disk into extended licenses.

pub mod config;
pub mod license;
pub mod logging;

pub use config::{AppConfig, LicenseConfig, LoggingConfig, RevocationConfig};
pub use license::{
    extend, extend_with_probe, load_document, open_extended, resolve_document_path,
    save_document,
};
pub use logging::{init_tracing, LogFormat};
