mod controller;
pub mod view;

pub use controller::{SessionController, SessionOptions};
pub use view::{CompletedNote, Refresh, SessionSnapshot};
