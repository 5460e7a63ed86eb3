pub mod channel;

pub use channel::ChannelError;
pub use channel::ProcChannel;

/// Well-known entry exposed by the backing kernel module.
pub const DEFAULT_PROC_PATH: &str = "/proc/myprocfile";
