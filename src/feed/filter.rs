//! Search/filter engine
//!
//! Produces the visible subset of the feed from the active category token
//! and the free-text search query. Pure and order-preserving; callers
//! re-derive the subset in full whenever an input changes.
//!
//! The category token is a fuzzy tag match: it is compared as a
//! case-insensitive substring against both the category type and every
//! theme tag, so `food` selects a "Food & Beverage" post as well as a
//! "Heritage" post tagged "Street Food".

use super::types::Post;

/// Category token that disables category filtering
pub const ALL_CATEGORIES: &str = "all";

/// One entry of the category tab bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTab {
    /// Token handed to the filter
    pub id: &'static str,
    pub name: &'static str,
}

/// Category tabs offered by the feed, in display order
pub const CATEGORY_TABS: &[CategoryTab] = &[
    CategoryTab { id: ALL_CATEGORIES, name: "All" },
    CategoryTab { id: "food", name: "Food & Beverage" },
    CategoryTab { id: "accommodation", name: "Accommodation" },
    CategoryTab { id: "attraction", name: "Attraction" },
    CategoryTab { id: "shopping", name: "Shopping" },
    CategoryTab { id: "entertainment", name: "Entertainment/Nightlife" },
    CategoryTab { id: "transport", name: "Transport" },
];

/// Look up a tab by its token, ignoring case
pub fn category_tab(id: &str) -> Option<&'static CategoryTab> {
    let id = id.trim();
    CATEGORY_TABS.iter().find(|tab| tab.id.eq_ignore_ascii_case(id))
}

/// Presentation-held filter inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub active_category: String,
    pub search_query: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORIES.to_string(),
            search_query: String::new(),
        }
    }
}

impl FilterState {
    pub fn new(active_category: impl Into<String>, search_query: impl Into<String>) -> Self {
        Self {
            active_category: active_category.into(),
            search_query: search_query.into(),
        }
    }

    /// Apply this state to a post sequence
    pub fn apply<'a, I>(&self, posts: I) -> Vec<&'a Post>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        filter(posts, &self.active_category, &self.search_query)
    }
}

/// Visible posts for a category token and search query, in input order
pub fn filter<'a, I>(posts: I, active_category: &str, search_query: &str) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let category = normalize_category(active_category);
    let query = search_query.to_lowercase();

    let visible: Vec<&Post> = posts
        .into_iter()
        .filter(|post| category_matches(post, category.as_deref()))
        .filter(|post| query.is_empty() || text_matches(post, &query))
        .collect();

    tracing::debug!(
        category = %active_category,
        query = %search_query,
        visible = visible.len(),
        "Filtered feed"
    );
    visible
}

/// Whether a post passes the category predicate
pub fn matches_category(post: &Post, active_category: &str) -> bool {
    category_matches(post, normalize_category(active_category).as_deref())
}

/// Whether a post passes the text predicate (an empty query always passes)
pub fn matches_query(post: &Post, search_query: &str) -> bool {
    search_query.is_empty() || text_matches(post, &search_query.to_lowercase())
}

/// Lowercased token, or `None` when the token selects everything
fn normalize_category(token: &str) -> Option<String> {
    let token = token.trim().to_lowercase();
    if token == ALL_CATEGORIES {
        None
    } else {
        Some(token)
    }
}

fn category_matches(post: &Post, token: Option<&str>) -> bool {
    match token {
        None => true,
        Some(token) => contains_folded(&post.category_type, token) || any_contains(&post.themes, token),
    }
}

fn text_matches(post: &Post, query: &str) -> bool {
    contains_folded(&post.title, query)
        || contains_folded(&post.short_description, query)
        || contains_folded(&post.area, query)
        || any_contains(&post.themes, query)
}

/// `needle` must already be lowercase
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn any_contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| contains_folded(v, needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_posts() -> Vec<Post> {
        vec![
            Post::new("1", "Maxwell Food Centre", "Food & Beverage")
                .with_area("Chinatown")
                .with_themes(["Local Food", "Hawker"])
                .with_short_description("Chicken rice and more"),
            Post::new("2", "Siloso Beach", "Beach")
                .with_area("Sentosa")
                .with_themes(["Relaxation", "Water Sports"])
                .with_short_description("Sun and sand"),
            Post::new("3", "ION Orchard", "Shopping")
                .with_area("Orchard")
                .with_themes(["Luxury", "Food Court"])
                .with_short_description("Flagship stores"),
            Post::new("4", "Buddha Tooth Relic Temple", "Cultural")
                .with_area("Chinatown")
                .with_themes(["Heritage", "History"])
                .with_short_description("Tang-style temple"),
            Post::new("5", "Gardens by the Bay", "Attraction")
                .with_area("Marina Bay")
                .with_themes(["Nature", "Iconic"])
                .with_short_description("Supertrees and domes"),
        ]
    }

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    /// Every output element appears in the input, in the same relative order
    fn is_subsequence(output: &[&Post], input: &[Post]) -> bool {
        let mut remaining = input.iter();
        output
            .iter()
            .all(|o| remaining.any(|i| std::ptr::eq(*o, i)))
    }

    #[test]
    fn test_all_with_empty_query_is_identity() {
        let posts = sample_posts();
        let visible = filter(&posts, "all", "");
        assert_eq!(visible.len(), posts.len());
        assert!(visible.iter().zip(&posts).all(|(v, p)| std::ptr::eq(*v, p)));
    }

    #[test]
    fn test_category_matches_type_or_theme() {
        let posts = sample_posts();
        // "Food & Beverage" by type, ION Orchard through its "Food Court" theme
        assert_eq!(ids(&filter(&posts, "food", "")), vec!["1", "3"]);
        assert_eq!(ids(&filter(&posts, "history", "")), vec!["4"]);
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let posts = sample_posts();
        assert_eq!(ids(&filter(&posts, "BEACH", "")), vec!["2"]);
        assert_eq!(filter(&posts, " ALL ", "").len(), 5);
    }

    #[test]
    fn test_query_searches_title_summary_area_and_themes() {
        let posts = sample_posts();
        assert_eq!(ids(&filter(&posts, "all", "chinatown")), vec!["1", "4"]);
        assert_eq!(ids(&filter(&posts, "all", "SUPERTREES")), vec!["5"]);
        assert_eq!(ids(&filter(&posts, "all", "water sports")), vec!["2"]);
        assert_eq!(ids(&filter(&posts, "all", "siloso")), vec!["2"]);
    }

    #[test]
    fn test_query_ignores_unsearched_fields() {
        let mut posts = sample_posts();
        posts[0].address = "1 Kadayanallur Street".to_string();
        posts[0].price_range = "cheap eats".to_string();
        assert!(filter(&posts, "all", "kadayanallur").is_empty());
        assert!(filter(&posts, "all", "cheap").is_empty());
    }

    #[test]
    fn test_category_and_query_combine() {
        let posts = sample_posts();
        assert_eq!(ids(&filter(&posts, "food", "orchard")), vec!["3"]);
        assert!(filter(&posts, "beach", "chinatown").is_empty());
    }

    #[test]
    fn test_empty_input() {
        let posts: Vec<Post> = Vec::new();
        assert!(filter(&posts, "food", "rice").is_empty());
    }

    #[test]
    fn test_outputs_satisfy_predicates() {
        let posts = sample_posts();
        let categories = ["all", "food", "beach", "cultural", "heritage", "nothing"];
        let queries = ["", "chinatown", "e", "zzz"];

        for category in categories {
            for query in queries {
                let visible = filter(&posts, category, query);
                assert!(is_subsequence(&visible, &posts));
                for post in &posts {
                    let expected = matches_category(post, category) && matches_query(post, query);
                    let included = visible.iter().any(|v| std::ptr::eq(*v, post));
                    assert_eq!(expected, included, "post {} {} {}", post.id, category, query);
                }
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let posts = sample_posts();
        for (category, query) in [("food", ""), ("all", "chinatown"), ("heritage", "temple")] {
            let once = filter(&posts, category, query);
            let twice = filter(once.iter().copied(), category, query);
            assert_eq!(ids(&once), ids(&twice));
        }
    }

    #[test]
    fn test_filter_state_default_and_apply() {
        let posts = sample_posts();
        let state = FilterState::default();
        assert_eq!(state.active_category, ALL_CATEGORIES);
        assert_eq!(state.apply(&posts).len(), 5);

        let state = FilterState::new("attraction", "marina");
        assert_eq!(ids(&state.apply(&posts)), vec!["5"]);
    }

    #[test]
    fn test_category_tabs_select_their_posts() {
        assert_eq!(CATEGORY_TABS[0].id, ALL_CATEGORIES);
        assert_eq!(category_tab("FOOD").unwrap().name, "Food & Beverage");
        assert!(category_tab("beach").is_none());

        let posts = vec![
            Post::new("a", "Lau Pa Sat", "Food & Beverage"),
            Post::new("b", "Raffles Hotel", "Accommodation"),
            Post::new("c", "Zouk", "Entertainment/Nightlife"),
            Post::new("d", "Cable Car", "Transport"),
        ];
        let cases = [
            ("food", vec!["a"]),
            ("accommodation", vec!["b"]),
            ("entertainment", vec!["c"]),
            ("transport", vec!["d"]),
            ("all", vec!["a", "b", "c", "d"]),
        ];
        for (tab, expected) in cases {
            assert!(category_tab(tab).is_some(), "{}", tab);
            assert_eq!(ids(&filter(&posts, tab, "")), expected, "{}", tab);
        }
    }

    #[test]
    fn test_end_to_end_three_posts() {
        let posts = vec![
            Post::new("a", "Lau Pa Sat", "Food"),
            Post::new("b", "Palawan Beach", "Beach"),
            Post::new("c", "VivoCity", "Shopping"),
        ];
        assert_eq!(ids(&filter(&posts, "food", "")), vec!["a"]);
    }
}
