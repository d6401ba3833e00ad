// handlers/mod.rs - resource handlers mounted under /api
//
// folders and tags share the same surface: list, show, create, update, delete.
// Deletes cascade through services::CleanupCoordinator.
// notes exposes just enough (list, show, create) to observe cascade effects.

pub mod folders;
pub mod notes;
pub mod tags;
pub mod utils;
