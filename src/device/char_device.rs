//! Character device implementation over `ioctl(2)`.
//!
//! Wraps an open `/dev/serial`-style node with our own [`ControlDevice`]
//! trait. The file descriptor is closed when the value is dropped.

use super::error::DeviceError;
use super::traits::ControlDevice;
use super::wire::{
    WireMessage, WireParams, SERIAL_GET_PARAMS, SERIAL_RECV_MSG, SERIAL_RX_BUFFER_CLEAR,
    SERIAL_SEND_MSG, SERIAL_SET_PARAMS,
};
use crate::message::Message;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An open serial control device.
pub struct CharDevice {
    file: File,
    path: PathBuf,
    name: String,
}

impl CharDevice {
    /// Open `path` read/write and make sure it is a character device.
    ///
    /// # Example
    /// ```no_run
    /// use sertool::device::{CharDevice, ControlDevice};
    ///
    /// let mut device = CharDevice::open("/dev/serial0")?;
    /// let params = device.get_params()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&path)
            .map_err(|source| DeviceError::Open {
                path: path.clone(),
                source,
            })?;

        let metadata = file.metadata().map_err(|source| DeviceError::Stat {
            path: path.clone(),
            source,
        })?;
        if !metadata.file_type().is_char_device() {
            return Err(DeviceError::NotCharDevice(path));
        }

        debug!(device = %path.display(), "opened control device");
        Ok(Self {
            file,
            name: path.display().to_string(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ioctl<T>(&self, request: u32, arg: *mut T) -> io::Result<usize> {
        // SAFETY: `arg` is either null for argument-less requests or points at a
        // live value whose layout matches what the driver expects for `request`.
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg) };
        if ret < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(ret as usize)
        }
    }

    fn message_ioctl(&self, request: u32, message: &mut Message) -> io::Result<usize> {
        if message.buffer.len() < message.requested_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "message buffer is shorter than the requested length",
            ));
        }
        let len = u32::try_from(message.requested_len).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "message too long for the driver")
        })?;
        let mut wire = WireMessage {
            flags: message.flags.bits(),
            len,
            buf: message.buffer.as_mut_ptr(),
        };
        self.ioctl(request, &mut wire)
    }
}

impl ControlDevice for CharDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_params(&mut self) -> io::Result<WireParams> {
        let mut params = WireParams::default();
        self.ioctl(SERIAL_GET_PARAMS, &mut params)?;
        Ok(params)
    }

    fn set_params(&mut self, params: &WireParams) -> io::Result<()> {
        let mut params = *params;
        self.ioctl(SERIAL_SET_PARAMS, &mut params).map(drop)
    }

    fn clear_rx_buffer(&mut self) -> io::Result<()> {
        self.ioctl(SERIAL_RX_BUFFER_CLEAR, std::ptr::null_mut::<libc::c_void>())
            .map(drop)
    }

    fn send_message(&mut self, message: &mut Message) -> io::Result<usize> {
        self.message_ioctl(SERIAL_SEND_MSG, message)
    }

    fn receive_message(&mut self, message: &mut Message) -> io::Result<usize> {
        self.message_ioctl(SERIAL_RECV_MSG, message)
    }
}

impl std::fmt::Debug for CharDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharDevice")
            .field("path", &self.path)
            .field("fd", &self.file.as_raw_fd())
            .finish()
    }
}
