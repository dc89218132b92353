//! The `RTM_NEWQDISC` request that installs a taprio qdisc.

use bytes::Bytes;
use nix::libc::TCA_OPTIONS;
use rtnetlink::packet_core::{
    DefaultNla, NLM_F_ACK, NLM_F_CREATE, NLM_F_EXCL, NLM_F_REPLACE, NLM_F_REQUEST, NetlinkMessage,
};
use rtnetlink::packet_route::{
    RouteNetlinkMessage,
    tc::{TcAttribute, TcHandle, TcMessage},
};
use taprio_wire::{Result, ScheduleConfig};

/// The qdisc kind string the kernel matches on.
pub const TAPRIO_KIND: &str = "taprio";

/// A handle string [`parse_handle`] does not accept.
#[derive(Debug, thiserror::Error)]
#[error("invalid tc handle {0:?}")]
pub struct InvalidHandle(pub String);

/// Parse a tc handle the way `tc` accepts it: `root`, `none`, `MAJOR:`, `MAJOR:MINOR` or
/// `MAJOR`, with both halves in hex.
pub fn parse_handle(s: &str) -> std::result::Result<TcHandle, InvalidHandle> {
    let invalid = || InvalidHandle(s.to_owned());
    let half = |part: &str| -> std::result::Result<u32, InvalidHandle> {
        if part.is_empty() {
            return Ok(0);
        }
        let part = part.strip_prefix("0x").unwrap_or(part);
        match u32::from_str_radix(part, 16) {
            Ok(value) if value <= 0xffff => Ok(value),
            _ => Err(invalid()),
        }
    };

    match s {
        "root" => Ok(TcHandle::ROOT),
        "none" => Ok(TcHandle::default()),
        _ => {
            let (major, minor) = s.split_once(':').unwrap_or((s, ""));
            if major.is_empty() {
                return Err(invalid());
            }
            Ok(TcHandle::from((half(major)? << 16) | half(minor)?))
        }
    }
}

/// Where the qdisc is installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QdiscTarget {
    /// The network interface index (from `if_nametoindex`).
    pub interface_index: i32,
    /// The parent handle (where this qdisc attaches).
    pub parent: TcHandle,
    /// This qdisc's own handle. Zero lets the kernel pick one.
    pub handle: TcHandle,
}

impl QdiscTarget {
    /// Target the root of the given interface, letting the kernel pick the handle.
    pub fn new(index: i32) -> Self {
        Self {
            interface_index: index,
            parent: TcHandle::ROOT,
            handle: TcHandle::default(),
        }
    }

    /// Set the parent handle.
    pub fn with_parent(mut self, parent: TcHandle) -> Self {
        self.parent = parent;
        self
    }

    /// Set this qdisc's handle.
    pub fn with_handle(mut self, handle: TcHandle) -> Self {
        self.handle = handle;
        self
    }
}

/// A taprio qdisc request, carrying the encoded options.
#[derive(Debug, Clone)]
pub struct QdiscTaprioRequest {
    /// Interface and handles the qdisc is installed at.
    pub target: QdiscTarget,
    /// The payload of `TCA_OPTIONS`, as produced by [`taprio_wire::encode`].
    pub options: Bytes,
    /// If true, replace an existing qdisc instead of failing if it exists.
    pub replace: bool,
}

impl QdiscTaprioRequest {
    /// Encode `config` for installation at `target`.
    pub fn new(target: QdiscTarget, config: &ScheduleConfig) -> Result<Self> {
        Ok(Self { target, options: taprio_wire::encode(config)?, replace: false })
    }

    /// When `true`, uses `NLM_F_REPLACE` to update an existing qdisc.
    /// When `false` (default), uses `NLM_F_EXCL` to fail if the qdisc exists.
    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Build the netlink message to create this taprio qdisc.
    pub fn build(self) -> NetlinkMessage<RouteNetlinkMessage> {
        let mut tc_message = TcMessage::with_index(self.target.interface_index);
        tc_message.header.parent = self.target.parent;
        tc_message.header.handle = self.target.handle;

        tc_message.attributes.push(TcAttribute::Kind(TAPRIO_KIND.to_string()));
        tc_message
            .attributes
            .push(TcAttribute::Other(DefaultNla::new(TCA_OPTIONS, self.options.to_vec())));

        let mut nl_req = NetlinkMessage::from(RouteNetlinkMessage::NewQueueDiscipline(tc_message));
        nl_req.header.flags = if self.replace {
            NLM_F_CREATE | NLM_F_REPLACE | NLM_F_REQUEST | NLM_F_ACK
        } else {
            NLM_F_CREATE | NLM_F_EXCL | NLM_F_REQUEST | NLM_F_ACK
        };

        tracing::debug!(?nl_req, "built taprio request");

        nl_req
    }

    /// Build the netlink message and serialize it, header included, as it would be sent on a
    /// `NETLINK_ROUTE` socket.
    pub fn to_message_bytes(self) -> Vec<u8> {
        let mut nl_req = self.build();
        nl_req.finalize();

        let mut buf = vec![0; nl_req.buffer_len()];
        nl_req.serialize(&mut buf);
        buf
    }
}
