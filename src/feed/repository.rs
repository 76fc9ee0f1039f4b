//! Post repository
//!
//! Owns the posts loaded for a session. Posts live in insertion-ordered
//! slots with an id index; dismissed slots are tombstoned so toggles and
//! dismissals never shift the remaining posts.

use super::types::Post;
use std::collections::HashMap;

/// Title and link handed to an external share action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub link: String,
}

/// Single-owner, order-preserving post collection keyed by id
#[derive(Debug, Default, Clone)]
pub struct PostRepository {
    slots: Vec<Option<Post>>,
    index: HashMap<String, usize>,
    live: usize,
}

impl PostRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from a freshly loaded list.
    ///
    /// Later posts reusing an id already seen are dropped.
    pub fn from_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        let mut repo = Self::new();
        for mut post in posts {
            if repo.index.contains_key(&post.id) {
                tracing::warn!(id = %post.id, "Dropping post with duplicate id");
                continue;
            }
            post.liked = false;
            post.saved = false;
            repo.index.insert(post.id.clone(), repo.slots.len());
            repo.slots.push(Some(post));
            repo.live += 1;
        }
        repo
    }

    /// Number of posts currently held
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a post by id
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.index
            .get(id)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    /// Iterate posts in load order
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Clone the posts out in load order
    pub fn to_vec(&self) -> Vec<Post> {
        self.iter().cloned().collect()
    }

    /// Flip the liked flag, returning the new value
    pub fn toggle_liked(&mut self, id: &str) -> Option<bool> {
        let post = self.get_mut(id)?;
        post.liked = !post.liked;
        Some(post.liked)
    }

    /// Flip the saved flag, returning the new value
    pub fn toggle_saved(&mut self, id: &str) -> Option<bool> {
        let post = self.get_mut(id)?;
        post.saved = !post.saved;
        Some(post.saved)
    }

    /// Remove a post. Dismissing an absent id is a no-op.
    pub fn dismiss(&mut self, id: &str) -> Option<Post> {
        let slot = self.index.remove(id)?;
        let removed = self.slots[slot].take();
        self.live -= 1;

        if self.slots.len() - self.live > self.live {
            self.compact();
        }
        removed
    }

    /// Title and link for sharing; never touches stored state
    pub fn share(&self, id: &str) -> Option<SharePayload> {
        self.get(id).map(|post| SharePayload {
            title: post.title.clone(),
            link: post.link.clone(),
        })
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Post> {
        let slot = *self.index.get(id)?;
        self.slots[slot].as_mut()
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.index = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, post)| post.as_ref().map(|p| (p.id.clone(), slot)))
            .collect();
    }
}

impl FromIterator<Post> for PostRepository {
    fn from_iter<I: IntoIterator<Item = Post>>(iter: I) -> Self {
        Self::from_posts(iter)
    }
}
