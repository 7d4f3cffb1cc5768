//! Deduplication against the persisted seen-set.

use crate::models::Listing;
use crate::storage::SeenStore;

/// Partition filtered listings into the new batch, recording each new key
/// in the seen-set as it is encountered.
///
/// Keys are inserted before any notification is attempted, so a crash
/// mid-batch never re-notifies earlier entries on restart. The flip side,
/// inherited deliberately, is that a failed delivery is not retried.
pub fn partition_new(listings: Vec<Listing>, seen: &mut SeenStore) -> Vec<Listing> {
    let mut fresh = Vec::new();
    for listing in listings {
        if seen.insert(listing.dedup_key()) {
            fresh.push(listing);
        }
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn listing(id: &str, title: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: title.to_string(),
            author: "익명".to_string(),
            date: "2026-08-20".to_string(),
            category: String::new(),
            link: String::new(),
        }
    }

    async fn empty_store(tmp: &TempDir) -> SeenStore {
        SeenStore::load(tmp.path().join("seen_posts.json")).await
    }

    #[tokio::test]
    async fn test_partition_skips_seen_ids() {
        let tmp = TempDir::new().unwrap();
        let mut seen = empty_store(&tmp).await;
        seen.insert("101");

        let batch = vec![listing("101", "A"), listing("102", "B (아르바이트)")];
        let fresh = partition_new(batch, &mut seen);

        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "102");
        assert!(seen.contains("101"));
        assert!(seen.contains("102"));
    }

    #[tokio::test]
    async fn test_second_run_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut seen = empty_store(&tmp).await;

        let batch = vec![listing("1", "알바 A"), listing("2", "알바 B")];
        let first = partition_new(batch.clone(), &mut seen);
        assert_eq!(first.len(), 2);

        let second = partition_new(batch, &mut seen);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_empty_id_keys_by_title() {
        let tmp = TempDir::new().unwrap();
        let mut seen = empty_store(&tmp).await;

        let fresh = partition_new(vec![listing("", "Weekend shift")], &mut seen);
        assert_eq!(fresh.len(), 1);
        assert!(seen.contains("Weekend shift"));

        let again = partition_new(vec![listing("", "Weekend shift")], &mut seen);
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn test_filter_then_partition_scenario() {
        use crate::models::FilterPolicy;

        let tmp = TempDir::new().unwrap();
        let mut seen = empty_store(&tmp).await;
        seen.insert("101");

        let policy = FilterPolicy::TitleKeywords {
            keywords: vec!["아르바이트".to_string()],
        };
        let fetched = vec![
            listing("101", "A (아르바이트)"),
            listing("102", "B (아르바이트)"),
            listing("103", "기숙사 공지"),
        ];

        let matched: Vec<_> = fetched.into_iter().filter(|l| policy.matches(l)).collect();
        assert_eq!(matched.len(), 2);

        let fresh = partition_new(matched, &mut seen);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "102");
        assert!(seen.contains("101"));
        assert!(seen.contains("102"));
        assert!(!seen.contains("103"));
    }

    #[tokio::test]
    async fn test_duplicate_keys_within_batch() {
        let tmp = TempDir::new().unwrap();
        let mut seen = empty_store(&tmp).await;

        let batch = vec![listing("7", "첫 공고"), listing("7", "중복 공고")];
        let fresh = partition_new(batch, &mut seen);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].title, "첫 공고");
    }
}
