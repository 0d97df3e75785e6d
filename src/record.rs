//! Best score persistence
//!
//! A single integer kept in LocalStorage under `"record"`. The simulation
//! never writes it directly: the host saves whenever a `RecordBroken` event
//! comes through.

/// The persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Record {
    pub best: u32,
}

impl Record {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "record";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Parse a stored value; anything non-numeric or negative counts as no record
    pub fn parse(stored: &str) -> Self {
        let stored = stored.trim();
        let best = stored.parse::<u32>().ok().or_else(|| {
            stored
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.floor().min(u32::MAX as f64) as u32)
        });
        Self::new(best.unwrap_or(0))
    }

    /// Raise the record; returns true if it changed
    pub fn raise(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load the record from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(value)) = storage.get_item(Self::STORAGE_KEY) {
                let record = Self::parse(&value);
                log::info!("Loaded record {}", record.best);
                return record;
            }
        }

        log::info!("No record found, starting fresh");
        Self::default()
    }

    /// Save the record to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(Self::STORAGE_KEY, &self.best.to_string())
                .is_err()
            {
                log::warn!("Failed to save record");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored_values() {
        assert_eq!(Record::parse("17").best, 17);
        assert_eq!(Record::parse(" 17 ").best, 17);
        assert_eq!(Record::parse("13.5").best, 13);
        assert_eq!(Record::parse("").best, 0);
        assert_eq!(Record::parse("abc").best, 0);
        assert_eq!(Record::parse("-4").best, 0);
        assert_eq!(Record::parse("NaN").best, 0);
    }

    #[test]
    fn test_raise_is_strict() {
        let mut record = Record::new(10);
        assert!(!record.raise(10));
        assert!(!record.raise(3));
        assert_eq!(record.best, 10);
        assert!(record.raise(11));
        assert_eq!(record.best, 11);
    }
}
