pub mod forward;
pub mod pool;
pub mod upstream_dial;

pub use forward::GatewayServer;
pub use pool::{HotPool, MemberState, PoolMember};
