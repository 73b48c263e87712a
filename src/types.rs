//! Core types for the trend and draft stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed set of content categories a trend can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Tech,
    Fashion,
    Food,
    Fitness,
    Travel,
    Music,
    Gaming,
    Beauty,
}

impl TrendCategory {
    /// Every category, in the order the UI presents them.
    pub const ALL: [TrendCategory; 8] = [
        TrendCategory::Tech,
        TrendCategory::Fashion,
        TrendCategory::Food,
        TrendCategory::Fitness,
        TrendCategory::Travel,
        TrendCategory::Music,
        TrendCategory::Gaming,
        TrendCategory::Beauty,
    ];
}

impl fmt::Display for TrendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendCategory::Tech => "Tech",
            TrendCategory::Fashion => "Fashion",
            TrendCategory::Food => "Food",
            TrendCategory::Fitness => "Fitness",
            TrendCategory::Travel => "Travel",
            TrendCategory::Music => "Music",
            TrendCategory::Gaming => "Gaming",
            TrendCategory::Beauty => "Beauty",
        };
        write!(f, "{}", name)
    }
}

/// Category selection for the trend feed. `All` is the sentinel that
/// disables category filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TrendCategory),
}

impl CategoryFilter {
    /// Whether a record with the given category passes this filter.
    pub fn matches(&self, category: TrendCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }
}

/// A trend as delivered by the remote feed.
///
/// Lives only in the working list; never persisted. The durable projection
/// is [`SavedTrend`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Feed-assigned identifier, unique within the working list.
    pub id: String,

    /// Display name (e.g. a hashtag or topic).
    pub name: String,

    /// Content category.
    pub category: TrendCategory,

    /// Growth over the trailing window, in percent.
    pub growth: f64,

    /// Short description of why this is trending.
    pub description: String,

    /// Platform the trend was observed on.
    pub platform: String,

    /// Post volume over the trailing window.
    pub volume: u64,
}

/// The persisted projection of a [`Trend`] the user has saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedTrend {
    pub id: String,
    pub name: String,
    pub category: TrendCategory,
    pub growth: f64,
    pub saved_at: DateTime<Utc>,
}

impl SavedTrend {
    /// Project a working-list trend into its saved form.
    pub fn from_trend(trend: &Trend, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: trend.id.clone(),
            name: trend.name.clone(),
            category: trend.category,
            growth: trend.growth,
            saved_at,
        }
    }
}

/// A draft post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Store-assigned identifier, unique within the collection.
    pub id: String,

    /// Post text.
    pub caption: String,

    /// Hashtags, in the order the user added them.
    pub hashtags: Vec<String>,

    /// Attached media references.
    pub media: Vec<String>,

    /// Target platform names.
    pub platforms: Vec<String>,

    /// When the draft was created. Never changes.
    pub created_at: DateTime<Utc>,

    /// When the draft was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    pub(crate) fn create(input: DraftInput, now: DateTime<Utc>) -> Self {
        Self {
            id: next_draft_id(now.timestamp_millis().max(0) as u64),
            caption: input.caption,
            hashtags: input.hashtags,
            media: input.media,
            platforms: input.platforms,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch over this draft, refreshing `updated_at`.
    /// `id` and `created_at` are never touched.
    pub(crate) fn apply(&mut self, patch: DraftPatch, now: DateTime<Utc>) {
        if let Some(caption) = patch.caption {
            self.caption = caption;
        }
        if let Some(hashtags) = patch.hashtags {
            self.hashtags = hashtags;
        }
        if let Some(media) = patch.media {
            self.media = media;
        }
        if let Some(platforms) = patch.platforms {
            self.platforms = platforms;
        }
        self.updated_at = now;
    }
}

/// Input for creating a new draft (before id/timestamps are assigned).
#[derive(Clone, Debug, Default)]
pub struct DraftInput {
    pub caption: String,
    pub hashtags: Vec<String>,
    pub media: Vec<String>,
    pub platforms: Vec<String>,
}

impl DraftInput {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            ..Default::default()
        }
    }

    pub fn with_hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.hashtags = hashtags;
        self
    }

    pub fn with_media(mut self, media: Vec<String>) -> Self {
        self.media = media;
        self
    }

    pub fn with_platforms(mut self, platforms: Vec<String>) -> Self {
        self.platforms = platforms;
        self
    }
}

/// Partial update for a draft. Only the fields set to `Some` are merged.
#[derive(Clone, Debug, Default)]
pub struct DraftPatch {
    pub caption: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub media: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
}

impl DraftPatch {
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.hashtags = Some(hashtags);
        self
    }

    pub fn media(mut self, media: Vec<String>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn platforms(mut self, platforms: Vec<String>) -> Self {
        self.platforms = Some(platforms);
        self
    }
}

/// Low bits reserved for same-millisecond creations.
const ID_SEQ_BITS: u64 = 10;

static LAST_DRAFT_ID: AtomicU64 = AtomicU64::new(0);

/// Generate a time-derived draft id, monotonic within this process.
///
/// The millisecond timestamp occupies the high bits; an atomic sequence
/// breaks ties when several drafts are created in the same millisecond.
fn next_draft_id(now_ms: u64) -> String {
    let floor = now_ms << ID_SEQ_BITS;
    loop {
        let prev = LAST_DRAFT_ID.load(Ordering::SeqCst);
        let next = if prev < floor { floor } else { prev + 1 };
        if LAST_DRAFT_ID
            .compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return format!("d{:013x}", next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_all_matches_everything() {
        for category in TrendCategory::ALL {
            assert!(CategoryFilter::All.matches(category));
        }
    }

    #[test]
    fn test_category_filter_only_matches_selected() {
        let filter = CategoryFilter::Only(TrendCategory::Tech);
        assert!(filter.matches(TrendCategory::Tech));
        assert!(!filter.matches(TrendCategory::Food));
    }

    #[test]
    fn test_draft_ids_unique_and_monotonic() {
        let now = Utc::now().timestamp_millis() as u64;
        let ids: Vec<String> = (0..100).map(|_| next_draft_id(now)).collect();

        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 100);

        // Same-millisecond ids still sort in creation order.
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_draft_create_assigns_equal_timestamps() {
        let now = Utc::now();
        let draft = Draft::create(DraftInput::new("hello"), now);
        assert_eq!(draft.created_at, draft.updated_at);
        assert_eq!(draft.caption, "hello");
        assert!(draft.hashtags.is_empty());
    }

    #[test]
    fn test_draft_apply_preserves_id_and_created_at() {
        let created = Utc::now();
        let mut draft = Draft::create(DraftInput::new("before"), created);
        let id = draft.id.clone();

        let later = created + chrono::Duration::seconds(5);
        draft.apply(DraftPatch::default().caption("after"), later);

        assert_eq!(draft.id, id);
        assert_eq!(draft.created_at, created);
        assert_eq!(draft.updated_at, later);
        assert_eq!(draft.caption, "after");
    }

    #[test]
    fn test_draft_apply_merges_only_provided_fields() {
        let now = Utc::now();
        let mut draft = Draft::create(
            DraftInput::new("caption").with_hashtags(vec!["#one".into()]),
            now,
        );

        draft.apply(DraftPatch::default().media(vec!["img-1".into()]), now);

        assert_eq!(draft.caption, "caption");
        assert_eq!(draft.hashtags, vec!["#one".to_string()]);
        assert_eq!(draft.media, vec!["img-1".to_string()]);
    }

    #[test]
    fn test_saved_trend_projection() {
        let trend = Trend {
            id: "t1".into(),
            name: "AI filters".into(),
            category: TrendCategory::Tech,
            growth: 42.5,
            description: "Everywhere this week".into(),
            platform: "instagram".into(),
            volume: 120_000,
        };

        let now = Utc::now();
        let saved = SavedTrend::from_trend(&trend, now);
        assert_eq!(saved.id, "t1");
        assert_eq!(saved.category, TrendCategory::Tech);
        assert_eq!(saved.saved_at, now);
    }

    #[test]
    fn test_category_filter_serde_roundtrip() {
        let all = serde_json::to_string(&CategoryFilter::All).unwrap();
        assert_eq!(all, "\"all\"");

        let only = serde_json::to_string(&CategoryFilter::Only(TrendCategory::Music)).unwrap();
        let parsed: CategoryFilter = serde_json::from_str(&only).unwrap();
        assert_eq!(parsed, CategoryFilter::Only(TrendCategory::Music));
    }
}
