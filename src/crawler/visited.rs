use std::collections::HashSet;
use tokio::sync::Mutex;
use url::Url;

/// Dedup key of a page: its escaped path. Scheme, query and fragment are
/// deliberately not part of it.
pub fn visit_key(url: &Url) -> String {
    url.path().to_string()
}

/// Paths that have been scheduled during this crawl.
///
/// A key is marked when the link is accepted, before its fetch is dispatched,
/// so two tasks discovering the same link cannot both schedule it.
#[derive(Default)]
pub struct VisitedSet {
    keys: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as visited and reports whether it already was.
    pub async fn check_and_mark(&self, key: &str) -> bool {
        let mut keys = self.keys.lock().await;
        !keys.insert(key.to_string())
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.keys.lock().await.contains(key)
    }

    pub async fn len(&self) -> usize {
        self.keys.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_key_ignores_query_and_scheme() {
        let a = Url::parse("https://example.test/about?a=1").unwrap();
        let b = Url::parse("http://example.test/about?a=2#team").unwrap();
        assert_eq!(visit_key(&a), "/about");
        assert_eq!(visit_key(&a), visit_key(&b));
    }

    #[test]
    fn test_key_keeps_escaping() {
        let url = Url::parse("https://example.test/a b/%7Euser").unwrap();
        assert_eq!(visit_key(&url), "/a%20b/%7Euser");
    }

    #[tokio::test]
    async fn test_check_and_mark_admits_once() {
        let visited = VisitedSet::new();
        assert!(!visited.check_and_mark("/about").await);
        assert!(visited.check_and_mark("/about").await);
        assert!(visited.contains("/about").await);
        assert_eq!(visited.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_marks_admit_exactly_one() {
        let visited = Arc::new(VisitedSet::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let visited = Arc::clone(&visited);
            handles.push(tokio::spawn(async move { visited.check_and_mark("/same").await }));
        }

        let mut admitted = 0;
        for handle in handles {
            if !handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
    }
}
