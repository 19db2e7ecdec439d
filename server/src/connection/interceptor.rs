use facade_shared::ClientboundPacket;

use crate::connection::connection::ConnectionKey;

/// What an interceptor decided to do with an outbound packet
#[derive(Debug, Clone, PartialEq)]
pub enum Interception {
    /// Pass the packet on unchanged
    Forward,
    /// Send these packets instead, in order. They continue through the
    /// interceptors after the one that produced them.
    Replace(Vec<ClientboundPacket>),
    /// Swallow the packet
    Drop,
}

/// Connection state visible to interceptors
#[derive(Debug, Clone, Copy)]
pub struct InterceptContext {
    pub key: ConnectionKey,
    /// Whether the connection's capability gate is open
    pub capable: bool,
}

/// Hook on a connection's send path. Interceptors run in registration order.
pub trait PacketInterceptor: Send + Sync {
    fn intercept(&self, packet: &ClientboundPacket, context: &InterceptContext) -> Interception;
}

/// Ordered set of interceptors attached to one connection
#[derive(Default)]
pub struct InterceptorChain {
    interceptors: Vec<Box<dyn PacketInterceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    pub fn push(&mut self, interceptor: Box<dyn PacketInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Runs `packet` through the whole chain, returning what should reach the
    /// wire
    pub fn dispatch(
        &self,
        packet: ClientboundPacket,
        context: &InterceptContext,
    ) -> Vec<ClientboundPacket> {
        let mut output = Vec::new();
        self.dispatch_from(0, packet, context, &mut output);
        output
    }

    fn dispatch_from(
        &self,
        start: usize,
        packet: ClientboundPacket,
        context: &InterceptContext,
        output: &mut Vec<ClientboundPacket>,
    ) {
        for index in start..self.interceptors.len() {
            match self.interceptors[index].intercept(&packet, context) {
                Interception::Forward => continue,
                Interception::Drop => return,
                Interception::Replace(replacements) => {
                    for replacement in replacements {
                        self.dispatch_from(index + 1, replacement, context, output);
                    }
                    return;
                }
            }
        }
        output.push(packet);
    }
}
