pub mod sessions;

pub use sessions::{SessionClock, SessionSnapshot};
