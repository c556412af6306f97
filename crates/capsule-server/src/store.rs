use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use capsule_core::{Failure, PageMeta};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use uuid::Uuid;

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
}

/// A post owned by a user
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(skip)]
    seq: u64,
}

/// In-memory persistence for the demo resources
///
/// Lookups of identifiers that do not resolve raise
/// [`Failure::NotFound`] with the entity type name, which the classifier
/// turns into the 404 `DATA_NOT_FOUND` envelope.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
    posts: DashMap<Uuid, Post>,
    seq: AtomicU64,
}

impl Store {
    /// Create a user; returns `None` when the email is already registered
    pub fn create_user(&self, name: String, email: String, password_hash: String) -> Option<User> {
        let id = Uuid::new_v4();
        match self.inner.emails.entry(email.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                entry.insert(id);
                let user = User {
                    id,
                    name,
                    email,
                    password_hash,
                };
                self.inner.users.insert(id, user.clone());
                Some(user)
            }
        }
    }

    /// Look up a user by id
    ///
    /// # Errors
    ///
    /// Returns [`Failure::NotFound`] for `user` when the id does not resolve
    pub fn user(&self, id: Uuid) -> Result<User, Failure> {
        self.inner
            .users
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| Failure::not_found("user"))
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let id = *self.inner.emails.get(email)?;
        self.inner.users.get(&id).map(|entry| entry.clone())
    }

    pub fn create_post(&self, user_id: Uuid, title: String, content: String) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            seq: self.inner.seq.fetch_add(1, Ordering::Relaxed),
        };
        self.inner.posts.insert(post.id, post.clone());
        post
    }

    /// Look up a post by id
    ///
    /// # Errors
    ///
    /// Returns [`Failure::NotFound`] for `post` when the id does not resolve
    pub fn post(&self, id: Uuid) -> Result<Post, Failure> {
        self.inner
            .posts
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| Failure::not_found("post"))
    }

    /// Replace a post's title and content
    ///
    /// # Errors
    ///
    /// Returns [`Failure::NotFound`] when the id does not resolve
    pub fn update_post(&self, id: Uuid, title: String, content: String) -> Result<Post, Failure> {
        let mut entry = self.inner.posts.get_mut(&id).ok_or_else(|| Failure::not_found("post"))?;
        entry.title = title;
        entry.content = content;
        Ok(entry.clone())
    }

    /// Delete a post
    ///
    /// # Errors
    ///
    /// Returns [`Failure::NotFound`] when the id does not resolve
    pub fn delete_post(&self, id: Uuid) -> Result<(), Failure> {
        self.inner
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Failure::not_found("post"))
    }

    /// A caller's posts in creation order, one page at a time
    pub fn posts_for(&self, user_id: Uuid, page: u64, per_page: u64) -> (Vec<Post>, PageMeta) {
        let mut posts: Vec<Post> = self
            .inner
            .posts
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.clone())
            .collect();
        posts.sort_by_key(|post| post.seq);

        let total = u64::try_from(posts.len()).unwrap_or(u64::MAX);
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, last_page);

        let start = usize::try_from((page - 1) * per_page).unwrap_or(usize::MAX);
        let items: Vec<Post> = posts
            .into_iter()
            .skip(start)
            .take(usize::try_from(per_page).unwrap_or(usize::MAX))
            .collect();

        let meta = PageMeta {
            current_page: page,
            last_page,
            per_page,
            total,
        };
        (items, meta)
    }
}
