//! blog-core: domain models, the partial-update merge engine and services.
//!
//! This crate provides:
//! - `User` and `Post`: the persisted entities
//! - `Patch`: field-by-field merge of a sparse update onto a stored entity,
//!   derived per record type with `#[derive(Patch)]`
//! - Repository traits and the services that drive them

extern crate self as blog_core;

pub mod clock;
pub mod error;
pub mod model;
pub mod patch;
pub mod repository;
pub mod service;

pub use blog_patch_derive::Patch;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, PatchError, Result};
pub use model::{Post, User};
pub use patch::{patch_struct, Kind, Patch, PatchField, Reflect};
pub use repository::{Page, PostsRepository, UsersRepository, DEFAULT_LIMIT};
pub use service::{PostsService, UsersService};
