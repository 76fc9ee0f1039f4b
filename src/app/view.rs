//! Views and screens

use crate::feed::Post;
use std::fmt;

/// Client-side route
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Main feed at `/`
    #[default]
    Feed,
    /// Per-post chat at `/chat/{post_id}`
    Chat { post_id: String },
}

impl Route {
    /// Parse a path. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        if path.is_empty() || path == "/" {
            return Some(Self::Feed);
        }

        let rest = path.strip_prefix("/chat/")?;
        let post_id = rest.trim_end_matches('/');
        if post_id.is_empty() || post_id.contains('/') {
            return None;
        }
        Some(Self::Chat {
            post_id: post_id.to_string(),
        })
    }

    pub fn path(&self) -> String {
        match self {
            Self::Feed => "/".to_string(),
            Self::Chat { post_id } => format!("/chat/{}", post_id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Progress of the one-time feed load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// What the feed view shows right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<'a> {
    Loading,
    /// Blocking load failure; no partial feed
    Error(&'a str),
    /// Loaded, but nothing matches the current filters
    Empty,
    Posts(Vec<&'a Post>),
}

impl Screen<'_> {
    pub fn posts(&self) -> &[&Post] {
        match self {
            Self::Posts(posts) => posts,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Feed));
        assert_eq!(Route::parse(""), Some(Route::Feed));
        assert_eq!(
            Route::parse("/chat/42"),
            Some(Route::Chat {
                post_id: "42".to_string()
            })
        );
        assert_eq!(
            Route::parse("/chat/42/"),
            Some(Route::Chat {
                post_id: "42".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Route::parse("/chat/"), None);
        assert_eq!(Route::parse("/chat/1/2"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn test_path_round_trip() {
        let route = Route::Chat {
            post_id: "abc".to_string(),
        };
        assert_eq!(route.path(), "/chat/abc");
        assert_eq!(Route::parse(&route.path()), Some(route));
        assert_eq!(Route::Feed.to_string(), "/");
    }

    #[test]
    fn test_screen_posts() {
        let post = Post::new("1", "Haji Lane", "Shopping");
        assert_eq!(Screen::Posts(vec![&post]).posts().len(), 1);
        assert!(Screen::Empty.posts().is_empty());
        assert!(Screen::Error("boom").posts().is_empty());
    }
}
