use super::{Reader, Slot, Storage, Writer};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

const DEVICE_VERSION: u8 = 1;

/// Settings that belong to the unit rather than to a scene.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Panel mounted upside down.
    pub flip: bool,
}

impl DeviceConfig {
    fn to_bytes(self) -> Vec<u8> {
        let mut w = Writer::default();
        w.u8(DEVICE_VERSION);
        w.u8(self.flip as u8);
        w.finish()
    }

    fn from_bytes(bytes: &[u8]) -> Result<DeviceConfig> {
        let mut r = Reader::open(bytes)?;
        let version = r.u8()?;
        if version != DEVICE_VERSION {
            return Err(error!(UnknownVersion));
        }
        let flip = r.flag()?;
        r.end()?;
        Ok(DeviceConfig { flip })
    }
}

pub fn load_device(storage: &dyn Storage) -> Result<DeviceConfig> {
    DeviceConfig::from_bytes(&storage.read(Slot::Device)?)
}

pub fn save_device(storage: &mut dyn Storage, config: DeviceConfig) -> Result<()> {
    storage.write(Slot::Device, &config.to_bytes())
}

pub fn load_device_or_default(storage: &dyn Storage) -> DeviceConfig {
    load_device(storage).unwrap_or_else(|e| {
        log::debug!("device config not loaded: {}", e);
        DeviceConfig::default()
    })
}
