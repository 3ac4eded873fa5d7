pub mod neighbor;
pub mod tcp;

pub use neighbor::{AddressResolver, NeighborTableResolver, NoopResolver};
pub use tcp::{PortProber, TcpProber};
