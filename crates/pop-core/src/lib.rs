pub mod clock;
pub mod commands;
pub mod constants;
pub mod coordinator;
pub mod models;
pub mod overlay;
pub mod protocol;
pub mod router;
pub mod store;
pub mod tracing_setup;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::Coordinator;
