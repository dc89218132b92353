use bytes::{Buf, BufMut, BytesMut};

use crate::TC_QOPT_MAX_QUEUE;

/// Size of the serialized [`MqprioQopt`].
pub const MQPRIO_QOPT_LEN: usize = 1 + TC_QOPT_MAX_QUEUE + 1 + 2 * 2 * TC_QOPT_MAX_QUEUE;

/// The kernel's `tc_mqprio_qopt` structure carried by the priority map attribute.
///
/// Field order matters, the kernel reads this record as a raw struct.
///
/// From `<linux/pkt_sched.h>`:
///
/// ```c
/// struct tc_mqprio_qopt {
///     __u8  num_tc;
///     __u8  prio_tc_map[TC_QOPT_BITMASK + 1];
///     __u8  hw;
///     __u16 count[TC_QOPT_MAX_QUEUE];
///     __u16 offset[TC_QOPT_MAX_QUEUE];
/// };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MqprioQopt {
    /// Number of traffic classes.
    pub num_tc: u8,
    /// Priority to traffic class map.
    pub prio_tc_map: [u8; TC_QOPT_MAX_QUEUE],
    /// Hardware offload request. Always zero for taprio.
    pub hw: u8,
    /// Number of queues per traffic class.
    pub count: [u16; TC_QOPT_MAX_QUEUE],
    /// First queue of each traffic class.
    pub offset: [u16; TC_QOPT_MAX_QUEUE],
}

impl MqprioQopt {
    /// Serialize in native endian order, matching the kernel's struct layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(MQPRIO_QOPT_LEN);
        buf.put_u8(self.num_tc);
        buf.put_slice(&self.prio_tc_map);
        buf.put_u8(self.hw);
        for count in self.count {
            buf.put_u16_ne(count);
        }
        for offset in self.offset {
            buf.put_u16_ne(offset);
        }
        buf.to_vec()
    }

    /// Parse the record from an attribute payload. Returns `None` if the payload is too short.
    ///
    /// Trailing bytes beyond the known layout are ignored.
    pub fn from_bytes(mut src: &[u8]) -> Option<Self> {
        if src.len() < MQPRIO_QOPT_LEN {
            return None;
        }

        let mut qopt = Self { num_tc: src.get_u8(), ..Default::default() };
        src.copy_to_slice(&mut qopt.prio_tc_map);
        qopt.hw = src.get_u8();
        for count in &mut qopt.count {
            *count = src.get_u16_ne();
        }
        for offset in &mut qopt.offset {
            *offset = src.get_u16_ne();
        }

        Some(qopt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_kernel_struct() {
        assert_eq!(MQPRIO_QOPT_LEN, 82);

        let mut qopt = MqprioQopt { num_tc: 3, ..Default::default() };
        qopt.prio_tc_map[1] = 2;
        qopt.count[0] = 4;
        qopt.offset[15] = 7;

        let bytes = qopt.to_bytes();
        assert_eq!(bytes.len(), MQPRIO_QOPT_LEN);
        assert_eq!(bytes[0], 3);
        assert_eq!(bytes[2], 2);
        assert_eq!(bytes[17], 0);
        assert_eq!(&bytes[18..20], &4u16.to_ne_bytes());
        assert_eq!(&bytes[80..82], &7u16.to_ne_bytes());
        assert_eq!(MqprioQopt::from_bytes(&bytes), Some(qopt));
    }

    #[test]
    fn short_payload_is_rejected() {
        assert_eq!(MqprioQopt::from_bytes(&[0u8; MQPRIO_QOPT_LEN - 1]), None);
    }
}
