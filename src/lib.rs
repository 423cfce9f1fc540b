//! Marché Docs - document review workflow for public-works contracts
//!
//! A mandataire submits lettered versions of a document (A, B, C...), diffuses
//! them to the maître d'œuvre (MOE) and the MOE answers with a visa:
//! VSO (approved as is), VAO (approved with observations, which opens the next
//! version) or Refusé.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
