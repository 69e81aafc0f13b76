//! Page numbers and the storage keys derived from them.

use std::fmt;

/// Prefix of every vault page key inside a player's record.
const KEY_PREFIX: &str = "vault_page_";

/// A vault page number, always ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page, which every player can open.
    pub const FIRST: PageNumber = PageNumber(1);

    /// Build a page number, clamping anything below 1 up to 1.
    pub fn new(page: u32) -> Self {
        Self(page.max(1))
    }

    /// Clamp an arbitrary signed request into the valid page range.
    pub fn clamped(page: i64) -> Self {
        Self(u32::try_from(page.max(1)).unwrap_or(u32::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key under which one page is stored in a player's record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derive the key for `page`. Injective over page numbers.
    pub fn for_page(page: PageNumber) -> Self {
        Self(format!("{KEY_PREFIX}{page}"))
    }

    /// Recover the page number from a key produced by [`StorageKey::for_page`].
    ///
    /// Returns `None` for keys that are not vault page keys.
    pub fn page_of(key: &str) -> Option<PageNumber> {
        let digits = key.strip_prefix(KEY_PREFIX)?;
        // Canonical form only: `vault_page_01` is not page 1.
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        match digits.parse::<u32>() {
            Ok(n) if n >= 1 => Some(PageNumber(n)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format_is_stable() {
        assert_eq!(StorageKey::for_page(PageNumber::new(1)).as_str(), "vault_page_1");
        assert_eq!(StorageKey::for_page(PageNumber::new(42)).as_str(), "vault_page_42");
    }

    #[test]
    fn distinct_pages_never_collide() {
        let keys: std::collections::HashSet<_> = (1..=500)
            .map(|p| StorageKey::for_page(PageNumber::new(p)))
            .collect();
        assert_eq!(keys.len(), 500);
    }

    #[test]
    fn sub_one_pages_clamp_to_first() {
        assert_eq!(PageNumber::new(0), PageNumber::FIRST);
        assert_eq!(PageNumber::clamped(-7), PageNumber::FIRST);
        assert_eq!(PageNumber::clamped(3).get(), 3);
        assert_eq!(PageNumber::clamped(i64::MAX).get(), u32::MAX);
    }

    #[test]
    fn page_of_parses_only_vault_keys() {
        assert_eq!(StorageKey::page_of("vault_page_12"), Some(PageNumber::new(12)));
        assert_eq!(StorageKey::page_of("vault_page_0"), None);
        assert_eq!(StorageKey::page_of("vault_page_"), None);
        assert_eq!(StorageKey::page_of("vault_page_+3"), None);
        assert_eq!(StorageKey::page_of("homes_1"), None);
    }

    #[test]
    fn page_of_rejects_leading_zeros() {
        assert_eq!(StorageKey::page_of("vault_page_01"), None);
        assert_eq!(StorageKey::page_of("vault_page_007"), None);
        assert_eq!(StorageKey::page_of("vault_page_10"), Some(PageNumber::new(10)));
    }
}
