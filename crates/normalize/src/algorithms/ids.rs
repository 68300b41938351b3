use std::sync::atomic::{AtomicU64, Ordering};

use uuid::{Builder, Uuid};

use crate::traits::IdProvider;

/// Random version-4 UUIDs from the operating system's secure source
#[derive(Debug, Clone, Default)]
pub struct UuidV4Provider;

impl IdProvider for UuidV4Provider {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic identifiers with the version-4 layout, counting up from a seed
#[derive(Debug, Default)]
pub struct SequentialIdProvider {
    next: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }
}

impl IdProvider for SequentialIdProvider {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; 16];
        bytes[8..].copy_from_slice(&n.to_be_bytes());
        Builder::from_random_bytes(bytes).into_uuid().to_string()
    }
}

/// Check the textual UUID version-4 layout: 36 characters, hyphenated,
/// version nibble `4` and variant nibble in `8..=b`.
pub fn is_uuid_v4_layout(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() != 36 {
        return false;
    }

    let hyphens_ok = [8, 13, 18, 23].iter().all(|&i| bytes[i] == b'-');
    let hex_ok = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| ![8, 13, 18, 23].contains(i))
        .all(|(_, b)| b.is_ascii_digit() || (b'a'..=b'f').contains(b));

    hyphens_ok && hex_ok && bytes[14] == b'4' && matches!(bytes[19], b'8' | b'9' | b'a' | b'b')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_have_v4_layout() {
        let provider = UuidV4Provider;
        let a = provider.next_id();
        let b = provider.next_id();

        assert!(is_uuid_v4_layout(&a), "bad layout: {a}");
        assert!(is_uuid_v4_layout(&b), "bad layout: {b}");
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids_are_deterministic() {
        let first = SequentialIdProvider::new();
        let second = SequentialIdProvider::new();

        let ids: Vec<String> = (0..3).map(|_| first.next_id()).collect();
        let again: Vec<String> = (0..3).map(|_| second.next_id()).collect();

        assert_eq!(ids, again);
        assert_eq!(ids[0], "00000000-0000-4000-8000-000000000000");
        assert_eq!(ids[2], "00000000-0000-4000-8000-000000000002");
        assert!(ids.iter().all(|id| is_uuid_v4_layout(id)));
    }

    #[test]
    fn test_sequential_seed() {
        let provider = SequentialIdProvider::starting_at(255);
        assert_eq!(provider.next_id(), "00000000-0000-4000-8000-0000000000ff");
    }

    #[test]
    fn test_layout_rejects_malformed_ids() {
        assert!(!is_uuid_v4_layout("not-a-uuid"));
        assert!(!is_uuid_v4_layout("00000000-0000-1000-8000-000000000000"));
        assert!(!is_uuid_v4_layout("00000000-0000-4000-c000-000000000000"));
        assert!(!is_uuid_v4_layout("00000000-0000-4000-8000-00000000000G"));
    }
}
