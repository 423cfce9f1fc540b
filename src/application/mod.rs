//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers change documents, versions and visas; query handlers
//! only read them.

pub mod handlers;

pub use handlers::{
    // Document handlers
    AttachVersionFileCommand, AttachVersionFileHandler, AttachVersionFileResult,
    CreateDocumentCommand, CreateDocumentHandler, CreateDocumentResult,
    DiffuseDocumentCommand, DiffuseDocumentHandler, DiffuseDocumentResult,
    OpenRevisionCommand, OpenRevisionHandler, OpenRevisionResult,
    // Queries
    DocumentHistory, GetDocumentHistoryHandler, GetDocumentHistoryQuery,
    ListMarcheDocumentsHandler, ListMarcheDocumentsQuery,
    // Visa handlers
    IssueVisaCommand, IssueVisaHandler, IssueVisaResult,
    // Uploads
    FileUpload,
};
