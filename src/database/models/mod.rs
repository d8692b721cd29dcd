pub mod note;
pub mod role;
pub mod user;

pub use note::{NewNote, Note, NotePatch};
pub use role::Role;
pub use user::User;
