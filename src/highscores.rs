//! Best score persistence
//!
//! A single scalar, persisted to LocalStorage in the browser. Anything
//! unreadable counts as no best score yet.

/// Persistence collaborator for the best score
pub trait BestScoreStore {
    /// Stored best score; missing or corrupt data reads as 0
    fn load_best_score(&self) -> u32;
    fn save_best_score(&mut self, score: u32);
}

/// Decode a stored best score
pub fn parse_best_score(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.trim().parse::<u32>() {
        Ok(score) => score,
        Err(_) => {
            log::warn!("Corrupt best score {:?}, starting fresh", raw);
            0
        }
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Raw stored value, as LocalStorage would hold it
    pub raw: Option<String>,
    /// Number of saves performed
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Some(raw.to_string()),
            writes: 0,
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best_score(&self) -> u32 {
        parse_best_score(self.raw.as_deref())
    }

    fn save_best_score(&mut self, score: u32) {
        self.raw = Some(score.to_string());
        self.writes += 1;
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "flappyHighScore";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn load_best_score(&self) -> u32 {
        let raw = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let best = parse_best_score(raw.as_deref());
        log::info!("Loaded best score {}", best);
        best
    }

    fn save_best_score(&mut self, score: u32) {
        if let Some(storage) = Self::storage() {
            if storage
                .set_item(Self::STORAGE_KEY, &score.to_string())
                .is_ok()
            {
                log::info!("Best score saved ({})", score);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_is_zero() {
        assert_eq!(parse_best_score(None), 0);
        assert_eq!(MemoryStore::new().load_best_score(), 0);
    }

    #[test]
    fn test_corrupt_is_zero() {
        assert_eq!(parse_best_score(Some("")), 0);
        assert_eq!(parse_best_score(Some("NaN")), 0);
        assert_eq!(parse_best_score(Some("-4")), 0);
        assert_eq!(MemoryStore::with_raw("{\"score\":3}").load_best_score(), 0);
    }

    #[test]
    fn test_valid_value() {
        assert_eq!(parse_best_score(Some("17")), 17);
        assert_eq!(parse_best_score(Some(" 23\n")), 23);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        store.save_best_score(42);
        assert_eq!(store.load_best_score(), 42);
        assert_eq!(store.writes, 1);
    }
}
