use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use tokio::fs;

use crate::{Accessory, Result};

/// Accessories persisted as a JSON array between restarts.
pub struct AccessoryCache {
    path: PathBuf,
}

impl AccessoryCache {
    pub fn new(path: impl Into<PathBuf>) -> AccessoryCache {
        AccessoryCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<Accessory>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no accessory cache at {}", self.path.display());
                return Ok(vec![]);
            }
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn save(&self, accessories: &[Accessory]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(accessories)?;
        fs::write(&self.path, bytes).await?;

        debug!(
            "saved {} accessories to {}",
            accessories.len(),
            self.path.display()
        );

        Ok(())
    }
}
