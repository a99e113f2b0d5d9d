//! In-memory object source.

use std::collections::HashMap;
use std::io;

use super::ObjectSource;
use crate::error::ConvertError;

/// Serves objects from a map of location → bytes.
///
/// Useful for embedding the converter where bytes are already in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryObjectSource {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryObjectSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` at `location`, replacing any previous object.
    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.objects.insert(location.into(), bytes.into());
    }

    pub fn with(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }
}

impl ObjectSource for MemoryObjectSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, ConvertError> {
        self.objects
            .get(location)
            .cloned()
            .ok_or_else(|| ConvertError::Fetch {
                location: location.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such object"),
            })
    }
}
