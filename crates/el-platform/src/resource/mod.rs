//! Generic CRUD framework: capability traits, store seam, service and
//! HTTP controller shared by every resource.

pub mod api;
pub mod entity;
pub mod export;
pub mod memory;
pub mod service;
pub mod store;

pub use api::{crud_router, CrudPermissions};
pub use entity::Resource;
pub use export::{ExportFormat, Exportable, FieldSpec};
pub use memory::MemoryStore;
pub use service::CrudService;
pub use store::ResourceStore;
