pub mod named;
pub mod note;

pub use named::{Folder, NamedEntity, Tag};
pub use note::{NewNote, Note};
