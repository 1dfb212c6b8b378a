//! Connection types: the upgraded stream, its registry handle, and the
//! loops that drive it.

pub mod frame;
pub mod handle;
pub(crate) mod reader;
pub mod state;
pub(crate) mod writer;

use std::fmt;
use std::net::SocketAddr;

use self::frame::{FrameSink, FrameStream};

/// An upgraded stream waiting to be admitted by the hub.
///
/// Carries no identity; the hub assigns one on admission.
pub struct Connection {
    remote_addr: SocketAddr,
    sink: Box<dyn FrameSink>,
    stream: Box<dyn FrameStream>,
}

impl Connection {
    /// Wrap the two halves of an upgraded stream.
    pub fn new(
        remote_addr: SocketAddr,
        sink: impl FrameSink,
        stream: impl FrameStream,
    ) -> Self {
        Self {
            remote_addr,
            sink: Box::new(sink),
            stream: Box::new(stream),
        }
    }

    /// Peer address.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub(crate) fn into_parts(self) -> (SocketAddr, Box<dyn FrameSink>, Box<dyn FrameStream>) {
        (self.remote_addr, self.sink, self.stream)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("remote_addr", &self.remote_addr)
            .finish_non_exhaustive()
    }
}
