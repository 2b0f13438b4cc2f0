//! C layouts exchanged with the driver and the ioctl request numbers.
//!
//! Request numbers use the generic Linux `_IOC` encoding: 2 direction bits,
//! 14 size bits, 8 type bits and 8 number bits.

use std::mem::size_of;

/// Parameter record as the driver lays it out.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WireParams {
    pub flags: u16,
    pub baud_rate: u32,
    pub data_bits: u32,
    pub rcv_timeout: i32,
    pub xmit_timeout: i32,
    pub parity: u32,
    pub stop_bits: u32,
    pub rx_fifo_trigger: u8,
    pub tx_fifo_trigger: u8,
    pub dma: bool,
    pub rx_fifo_dma_trigger: u8,
    pub tx_fifo_dma_trigger: u8,
    pub rx_gran: u8,
    pub tx_gran: u8,
}

/// Message record passed by pointer to the send/receive requests.
///
/// The request numbers encode the argument as a pointer, not as this record,
/// so their size field is the pointer width.
/// `buf` must point at no fewer than `len` bytes for the duration of the call.
#[repr(C)]
#[derive(Debug)]
pub struct WireMessage {
    pub flags: u16,
    pub len: u32,
    pub buf: *mut u8,
}

/// ioctl type byte for the serial driver.
pub const SERIAL_IOC_MAGIC: u8 = b'h';

const IOC_NRBITS: u32 = 8;
const IOC_TYPEBITS: u32 = 8;
const IOC_SIZEBITS: u32 = 14;

const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;

const IOC_NONE: u32 = 0;
const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

const fn ioc(dir: u32, ty: u8, nr: u8, size: usize) -> u32 {
    (dir << IOC_DIRSHIFT)
        | ((ty as u32) << IOC_TYPESHIFT)
        | ((nr as u32) << IOC_NRSHIFT)
        | ((size as u32) << IOC_SIZESHIFT)
}

/// `_IOR('h', 1, WireParams)`
pub const SERIAL_GET_PARAMS: u32 = ioc(IOC_READ, SERIAL_IOC_MAGIC, 1, size_of::<WireParams>());
/// `_IOW('h', 2, WireParams)`
pub const SERIAL_SET_PARAMS: u32 = ioc(IOC_WRITE, SERIAL_IOC_MAGIC, 2, size_of::<WireParams>());
/// `_IO('h', 3)`
pub const SERIAL_RX_BUFFER_CLEAR: u32 = ioc(IOC_NONE, SERIAL_IOC_MAGIC, 3, 0);
/// `_IOW('h', 4, char *)`
pub const SERIAL_SEND_MSG: u32 = ioc(IOC_WRITE, SERIAL_IOC_MAGIC, 4, size_of::<*mut u8>());
/// `_IOR('h', 5, char *)`
pub const SERIAL_RECV_MSG: u32 = ioc(IOC_READ, SERIAL_IOC_MAGIC, 5, size_of::<*mut u8>());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_layout_matches_driver() {
        // u16 + pad, six u32/i32, seven bytes, tail padding to 4.
        assert_eq!(size_of::<WireParams>(), 36);
        assert_eq!(std::mem::align_of::<WireParams>(), 4);
    }

    #[test]
    fn test_request_numbers() {
        assert_eq!(SERIAL_RX_BUFFER_CLEAR, 0x0000_6803);
        assert_eq!(SERIAL_GET_PARAMS, 0x8024_6801);
        assert_eq!(SERIAL_SET_PARAMS, 0x4024_6802);
    }

    #[test]
    fn test_message_requests_encode_direction() {
        assert_eq!(SERIAL_SEND_MSG >> IOC_DIRSHIFT, IOC_WRITE);
        assert_eq!(SERIAL_RECV_MSG >> IOC_DIRSHIFT, IOC_READ);
        assert_eq!(SERIAL_SEND_MSG & 0xff, 4);
        assert_eq!(SERIAL_RECV_MSG & 0xff, 5);
        assert_eq!(
            (SERIAL_SEND_MSG >> IOC_SIZESHIFT) & ((1 << IOC_SIZEBITS) - 1),
            size_of::<*mut u8>() as u32
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_message_request_numbers_use_pointer_size() {
        assert_eq!(SERIAL_SEND_MSG, 0x4008_6804);
        assert_eq!(SERIAL_RECV_MSG, 0x8008_6805);
    }
}
