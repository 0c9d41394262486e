//! Orchestration services for the project catalog.

mod catalog;

pub use catalog::{
    CreateProjectRequest, ProjectCatalogError, ProjectCatalogResult, ProjectCatalogService,
};
