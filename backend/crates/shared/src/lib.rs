//! Shared Kernel
//!
//! Vocabulary shared by every crate of the judge backend:
//! - the error taxonomy ([`error::kind::ErrorKind`]) and the boundary error
//!   ([`error::app_error::AppError`]) rendered on the wire
//! - typed identifiers ([`id::Id`]) for users, submissions and scratch runs
//! - a JSON extractor whose rejections are [`error::app_error::AppError`]s
//!
//! Only things whose meaning is identical across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
