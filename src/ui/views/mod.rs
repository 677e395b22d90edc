mod user_list;

pub use user_list::{draw_user_list, ListStatus};
