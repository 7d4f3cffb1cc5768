//! Listing data structure.

use serde::{Deserialize, Serialize};

/// Placeholder title for rows where no title element was found.
pub const NO_TITLE: &str = "제목 없음";

/// Placeholder author for rows where no author element was found.
pub const ANONYMOUS: &str = "익명";

/// A job listing fetched from a board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Post identifier (empty string when the source exposes none)
    pub id: String,

    /// Listing title
    pub title: String,

    /// Author display name
    pub author: String,

    /// Posting date as shown on the board
    pub date: String,

    /// Board/category label
    pub category: String,

    /// Full URL to the post (empty string when unknown)
    pub link: String,
}

impl Listing {
    /// Key used for deduplication: the id when present, otherwise the
    /// title. Title keying is a degraded-uniqueness fallback for boards
    /// that expose no stable identifier.
    pub fn dedup_key(&self) -> &str {
        if self.id.is_empty() {
            &self.title
        } else {
            &self.id
        }
    }

    /// URL to show in the notification. Falls back to a constructed
    /// board permalink when the row carried no usable link.
    pub fn permalink(&self, post_url_base: &str) -> String {
        if !self.link.is_empty() {
            self.link.clone()
        } else {
            format!("{}/{}", post_url_base.trim_end_matches('/'), self.id)
        }
    }

    /// Format the Telegram notification body for this listing.
    pub fn format_message(&self, post_url_base: &str) -> String {
        let mut message = format!(
            "🔔 새로운 아르바이트 공고!\n\n📌 {}\n👤 작성자: {}\n📅 {}\n",
            self.title, self.author, self.date
        );
        if !self.category.is_empty() {
            message.push_str(&format!("🏷 {}\n", self.category));
        }
        message.push_str(&format!("\n🔗 {}", self.permalink(post_url_base)));
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            id: "1024".to_string(),
            title: "주말 카페 아르바이트 구함".to_string(),
            author: "홍길동".to_string(),
            date: "2026-08-20".to_string(),
            category: "학생생활".to_string(),
            link: String::new(),
        }
    }

    #[test]
    fn test_dedup_key_prefers_id() {
        let listing = sample_listing();
        assert_eq!(listing.dedup_key(), "1024");
    }

    #[test]
    fn test_dedup_key_falls_back_to_title() {
        let mut listing = sample_listing();
        listing.id = String::new();
        assert_eq!(listing.dedup_key(), "주말 카페 아르바이트 구함");
    }

    #[test]
    fn test_permalink_constructed_from_id() {
        let listing = sample_listing();
        assert_eq!(
            listing.permalink("https://koreatech.in/board"),
            "https://koreatech.in/board/1024"
        );
    }

    #[test]
    fn test_permalink_prefers_link() {
        let mut listing = sample_listing();
        listing.link = "https://koreatech.in/articles/1024".to_string();
        assert_eq!(
            listing.permalink("https://koreatech.in/board"),
            "https://koreatech.in/articles/1024"
        );
    }

    #[test]
    fn test_format_message_includes_fields() {
        let message = sample_listing().format_message("https://koreatech.in/board");
        assert!(message.contains("주말 카페 아르바이트 구함"));
        assert!(message.contains("홍길동"));
        assert!(message.contains("2026-08-20"));
        assert!(message.contains("학생생활"));
        assert!(message.contains("https://koreatech.in/board/1024"));
    }

    #[test]
    fn test_format_message_omits_empty_category() {
        let mut listing = sample_listing();
        listing.category = String::new();
        assert!(!listing.format_message("https://koreatech.in/board").contains("🏷"));
    }
}
