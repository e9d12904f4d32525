pub mod channel;
pub mod config;
pub mod control;
pub mod errors;
pub mod runs;
pub mod slot;
pub mod ticket;
pub mod transport;

pub use channel::{ChannelId, ControlArgs, ControlCommand, ControlRequest, WorkflowList};
pub use errors::SyncError;
pub use slot::{AlertState, StatusSink};
