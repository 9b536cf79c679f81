//! Use cases on top of the repositories.
//!
//! Every "update by id" operation loads the stored entity, folds the partial
//! update onto it with [`Patch`](crate::patch::Patch) and writes the whole
//! entity back.

pub mod posts;
pub mod users;

#[cfg(test)]
mod memory;

pub use posts::PostsService;
pub use users::UsersService;
