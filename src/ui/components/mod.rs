mod command_input;
mod input;
mod key_result;
mod search_input;
mod toast;
mod user_form;

pub use command_input::{CommandEvent, CommandInput};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};
pub use toast::{Toast, ToastLevel};
pub use user_form::{UserForm, UserFormEvent};
