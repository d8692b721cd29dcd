// Request handlers. Each performs a single service call and either renders a
// page or redirects back to the note list.
pub mod diagnostic;
pub mod form;
pub mod login;
pub mod notes;

pub use diagnostic::test_page;
pub use form::ValidForm;
pub use login::{login_form, login_submit, logout};
pub use notes::{add_note, delete_note, edit_note, list_notes, not_found, redirect_to_list};
