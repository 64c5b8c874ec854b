//! View-state machines. These own all interactive state the screens need
//! (queries, drafts, flags, banners) and call into the `api` traits; no
//! rendering happens here.

pub mod banner;
pub mod create_form;
pub mod login;
pub mod membership;
pub mod roster;
pub mod router;
pub mod todo_list;
