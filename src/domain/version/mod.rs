//! Version domain module.
//!
//! Each document is a sequence of lettered versions ("A", "B", ...). Only
//! the latest one is current; older ones keep their final status.

mod aggregate;
mod label;
mod status;

pub use aggregate::Version;
pub use label::VersionLabel;
pub use status::VersionStatus;
