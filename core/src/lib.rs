//! Client core for the grades classification service.
//!
//! # Overview
//! Authenticates with the client-credentials grant, reads course,
//! definition and classification data, and writes definitions and
//! classifications back. Responses arrive in four different wire shapes
//! (single-student report, group report, group-for-definition report and
//! definition hierarchy); all of them are normalized into one set of
//! domain types.
//!
//! # Design
//! - `RequestGateway` is the only component doing I/O. It fetches a fresh
//!   token for every call and threads it into that request alone.
//! - Managers (`Course`, `CourseDefinitions`, `CourseClassifications`)
//!   describe each call as an `HttpRequest` via `build_*` methods, then
//!   resolve the semester alias, execute, and normalize.
//! - Wire types live in `dto` and never leak into the domain types.
//! - Nothing is cached; every operation goes to the service and a failure
//!   is returned immediately.

pub mod classification;
pub mod classifications;
pub mod client;
pub mod config;
pub mod course;
pub mod definition;
pub mod definitions;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod http;

pub use classification::{Classification, ClassificationMap, ClassificationValue, Student};
pub use classifications::{CourseClassifications, SaveOptions};
pub use client::{GradesClient, Semester};
pub use config::{Endpoint, GradesConfig};
pub use course::{Completion, Course, CourseInfo, StudentGroup};
pub use definition::{
    ClassificationType, Definition, DefinitionWithChildren, EvaluationType, LocalizedNames,
    ValueType,
};
pub use definitions::{CourseDefinitions, DefinitionRef, DeleteOptions};
pub use dto::{DefinitionsByParent, Normalize, StudentReport};
pub use error::{GradesError, Result};
pub use gateway::{BearerToken, RequestGateway};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
