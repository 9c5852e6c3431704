mod channel;
pub mod run_update;

pub use channel::{Channel, Sender, Receiver};
pub use run_update::RunUpdate;
