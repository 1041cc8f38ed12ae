/*!
## Flash Module

Persistence of scenes and the device configuration. Records are
fixed-size little-endian images ending in a CRC-32, written to a
`Storage` backend one slot at a time.

*/

use crate::error;

mod device;
mod scene;
mod storage;

pub use device::{load_device, load_device_or_default, save_device, DeviceConfig};
pub use scene::{
    deserialize, load_scene, load_scene_or_default, save_scene, serialize, serialize_version,
    CURRENT_VERSION,
};
pub use storage::{DirStorage, MemStorage, Slot, Storage};

/// Appends little-endian fields to a record.
#[derive(Debug, Default)]
struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    fn u8(&mut self, n: u8) {
        self.bytes.push(n);
    }
    fn i8(&mut self, n: i8) {
        self.bytes.push(n as u8);
    }
    fn u16(&mut self, n: u16) {
        self.bytes.extend_from_slice(&n.to_le_bytes());
    }
    fn i16(&mut self, n: i16) {
        self.bytes.extend_from_slice(&n.to_le_bytes());
    }
    fn text(&mut self, s: &str, width: usize) {
        let start = self.bytes.len();
        self.bytes.extend(s.bytes().take(width));
        self.bytes.resize(start + width, 0);
    }
    /// Seals the record with the checksum of everything written.
    fn finish(mut self) -> Vec<u8> {
        let crc = crc::crc32::checksum_ieee(&self.bytes);
        self.bytes.extend_from_slice(&crc.to_le_bytes());
        self.bytes
    }
}

/// Reads fields back in the order `Writer` wrote them. Running past
/// the end reports a corrupt record.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

type Result<T> = std::result::Result<T, crate::lang::Error>;

impl<'a> Reader<'a> {
    /// Checks the trailing CRC and returns a reader over the body.
    fn open(bytes: &'a [u8]) -> Result<Reader<'a>> {
        if bytes.len() < 4 {
            return Err(error!(Corrupt; "TRUNCATED"));
        }
        let (body, tail) = bytes.split_at(bytes.len() - 4);
        let stored = u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]);
        if crc::crc32::checksum_ieee(body) != stored {
            return Err(error!(Corrupt; "CHECKSUM"));
        }
        Ok(Reader { bytes: body, pos: 0 })
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(error!(Corrupt; "TRUNCATED"));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }
    fn i8(&mut self) -> Result<i8> {
        Ok(self.u8()? as i8)
    }
    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }
    fn i16(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }
    fn flag(&mut self) -> Result<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(error!(Corrupt; "FLAG")),
        }
    }

    /// Zero-padded printable text.
    fn text(&mut self, width: usize) -> Result<String> {
        let field = self.take(width)?;
        let len = field.iter().position(|b| *b == 0).unwrap_or(width);
        let (text, padding) = field.split_at(len);
        if padding.iter().any(|b| *b != 0) || text.iter().any(|b| !(b' '..=b'~').contains(b)) {
            return Err(error!(Corrupt; "TEXT"));
        }
        Ok(text.iter().map(|b| *b as char).collect())
    }

    fn end(&self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(error!(Corrupt; "LENGTH"));
        }
        Ok(())
    }
}
