use crate::error;
use crate::lang::Error;
use crate::mach::SCENE_SLOTS;
use std::collections::HashMap;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Scene(usize),
    Device,
}

impl Slot {
    fn check(self) -> Result<Slot> {
        match self {
            Slot::Scene(n) if n >= SCENE_SLOTS => Err(error!(InvalidSlot)),
            _ => Ok(self),
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Slot::Scene(n) => write!(f, "scene {}", n),
            Slot::Device => write!(f, "device"),
        }
    }
}

/// Persistent memory addressed by slot.
pub trait Storage {
    /// `EmptySlot` when nothing was ever written there.
    fn read(&self, slot: Slot) -> Result<Vec<u8>>;
    fn write(&mut self, slot: Slot, bytes: &[u8]) -> Result<()>;
}

/// One file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    pub fn new<P: Into<PathBuf>>(dir: P) -> DirStorage {
        DirStorage { dir: dir.into() }
    }

    fn path(&self, slot: Slot) -> PathBuf {
        match slot {
            Slot::Scene(n) => self.dir.join(format!("scene_{:02}.bin", n)),
            Slot::Device => self.dir.join("device.bin"),
        }
    }
}

fn storage_failure(e: std::io::Error) -> Error {
    error!(StorageFailure; &e.to_string().to_uppercase())
}

impl Storage for DirStorage {
    fn read(&self, slot: Slot) -> Result<Vec<u8>> {
        let path = self.path(slot.check()?);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(error!(EmptySlot)),
            Err(e) => Err(storage_failure(e)),
        }
    }

    fn write(&mut self, slot: Slot, bytes: &[u8]) -> Result<()> {
        let path = self.path(slot.check()?);
        std::fs::create_dir_all(&self.dir).map_err(storage_failure)?;
        std::fs::write(path, bytes).map_err(storage_failure)
    }
}

/// Slots held in memory, for tests and hosts without a filesystem.
#[derive(Debug, Default, Clone)]
pub struct MemStorage {
    slots: HashMap<Slot, Vec<u8>>,
}

impl MemStorage {
    pub fn new() -> MemStorage {
        MemStorage::default()
    }
}

impl Storage for MemStorage {
    fn read(&self, slot: Slot) -> Result<Vec<u8>> {
        self.slots
            .get(&slot.check()?)
            .cloned()
            .ok_or_else(|| error!(EmptySlot))
    }

    fn write(&mut self, slot: Slot, bytes: &[u8]) -> Result<()> {
        self.slots.insert(slot.check()?, bytes.to_vec());
        Ok(())
    }
}
