//! Document handlers.
//!
//! Commands: create, attach a version file, diffuse, open a revision.
//! Queries: document history, documents of a marché.

mod attach_version_file;
mod create_document;
mod diffuse_document;
mod get_document_history;
mod list_marche_documents;
mod open_revision;

pub use attach_version_file::{
    AttachVersionFileCommand, AttachVersionFileHandler, AttachVersionFileResult,
};
pub use create_document::{CreateDocumentCommand, CreateDocumentHandler, CreateDocumentResult};
pub use diffuse_document::{
    DiffuseDocumentCommand, DiffuseDocumentHandler, DiffuseDocumentResult,
};
pub use get_document_history::{DocumentHistory, GetDocumentHistoryHandler, GetDocumentHistoryQuery};
pub use list_marche_documents::{ListMarcheDocumentsHandler, ListMarcheDocumentsQuery};
pub use open_revision::{OpenRevisionCommand, OpenRevisionHandler, OpenRevisionResult};
