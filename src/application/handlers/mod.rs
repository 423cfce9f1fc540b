//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

mod access;
mod rollback;
mod upload;

pub mod document;
pub mod visa;

#[cfg(test)]
mod test_support;

pub use document::{
    AttachVersionFileCommand, AttachVersionFileHandler, AttachVersionFileResult,
    CreateDocumentCommand, CreateDocumentHandler, CreateDocumentResult, DiffuseDocumentCommand,
    DiffuseDocumentHandler, DiffuseDocumentResult, DocumentHistory, GetDocumentHistoryHandler,
    GetDocumentHistoryQuery, ListMarcheDocumentsHandler, ListMarcheDocumentsQuery,
    OpenRevisionCommand, OpenRevisionHandler, OpenRevisionResult,
};
pub use upload::FileUpload;
pub use visa::{IssueVisaCommand, IssueVisaHandler, IssueVisaResult};
