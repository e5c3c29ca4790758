use chrono::Utc;
use tracing::{debug, info, warn};

use linkboard_types::models::{Author, NewPost, Post, Vote, VoteDirection};

use crate::{Resource, Result, StoreError, Table};

#[derive(Default)]
struct PostTable {
    /// Last issued post ID. Never decremented, so IDs are never reused.
    last_id: u32,
    posts: Vec<Post>,
}

impl PostTable {
    fn position(&self, id: u32) -> Result<usize> {
        self.posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(Resource::Post))
    }

    fn get_mut(&mut self, id: u32) -> Result<&mut Post> {
        let idx = self.position(id)?;
        Ok(&mut self.posts[idx])
    }
}

/// Net vote count: upvotes minus downvotes.
pub fn score(votes: &[Vote]) -> i32 {
    votes.iter().map(|v| i32::from(v.direction.value())).sum()
}

/// Share of upvotes among all votes, 0..=100, rounded down. Zero with no votes.
pub fn upvote_percentage(votes: &[Vote]) -> u8 {
    if votes.is_empty() {
        return 0;
    }

    let ups = votes
        .iter()
        .filter(|v| v.direction == VoteDirection::Up)
        .count();

    // Bounded by 100 since ups <= votes.len().
    (ups * 100 / votes.len()) as u8
}

fn recount(post: &mut Post) {
    post.score = score(&post.votes);
    post.upvote_percentage = upvote_percentage(&post.votes);
}

// Highest score first. Ties come out in no particular order.
fn sort_by_score(posts: &mut [Post]) {
    posts.sort_unstable_by(|a, b| b.score.cmp(&a.score));
}

/// Posts with their per-user votes and derived score.
#[derive(Default)]
pub struct PostStore {
    table: Table<PostTable>,
}

impl PostStore {
    pub fn new() -> Self {
        info!("Post store created");
        Self::default()
    }

    pub fn create(&self, post: NewPost) -> Result<u32> {
        let id = self.table.with_write(|table| {
            table.last_id += 1;
            let id = table.last_id;

            table.posts.push(Post {
                id,
                title: post.title,
                category: post.category,
                kind: post.kind,
                data: post.data,
                author: post.author,
                created_at: Utc::now(),
                views: 0,
                score: 0,
                upvote_percentage: 0,
                votes: Vec::new(),
            });
            Ok(id)
        })?;

        info!("Created post {}", id);
        Ok(id)
    }

    pub fn read_all(&self) -> Result<Vec<Post>> {
        debug!("List posts");
        self.collect_sorted(|_| true)
    }

    pub fn read_category(&self, category: &str) -> Result<Vec<Post>> {
        debug!("List posts in category '{}'", category);
        self.collect_sorted(|p| p.category == category)
    }

    pub fn read_user(&self, login: &str) -> Result<Vec<Post>> {
        debug!("List posts by '{}'", login);
        self.collect_sorted(|p| p.author.username == login)
    }

    pub fn read(&self, id: u32) -> Result<Post> {
        self.table.with_read(|table| {
            let idx = table.position(id).inspect_err(|_| {
                warn!("read: no post {}", id);
            })?;
            Ok(table.posts[idx].clone())
        })
    }

    /// Read a post for display, counting the view.
    pub fn view(&self, id: u32) -> Result<Post> {
        self.table.with_write(|table| {
            let post = table.get_mut(id).inspect_err(|_| {
                warn!("view: no post {}", id);
            })?;
            post.views = post.views.saturating_add(1);
            Ok(post.clone())
        })
    }

    pub fn upvote(&self, id: u32, user: &Author) -> Result<Post> {
        self.vote(id, user, VoteDirection::Up)
    }

    pub fn downvote(&self, id: u32, user: &Author) -> Result<Post> {
        self.vote(id, user, VoteDirection::Down)
    }

    /// Remove the user's vote. Fails with `NotFound(Vote)` if they have none.
    pub fn unvote(&self, id: u32, user: &Author) -> Result<Post> {
        self.vote(id, user, VoteDirection::None)
    }

    /// Set the user's standing vote on a post. `Up` and `Down` add or
    /// overwrite the single vote entry for this user; `None` removes it.
    ///
    /// The lookup of the existing vote and the mutation happen under one
    /// write lock, so concurrent callers can never both append an entry for
    /// the same user.
    pub fn vote(&self, id: u32, user: &Author, direction: VoteDirection) -> Result<Post> {
        let post = self.table.with_write(|table| {
            let post = table.get_mut(id).inspect_err(|_| {
                warn!("vote: no post {}", id);
            })?;

            let existing = post.votes.iter().position(|v| v.user_id == user.id);

            match (direction, existing) {
                (VoteDirection::None, Some(idx)) => {
                    post.votes.remove(idx);
                }
                (VoteDirection::None, None) => {
                    warn!("unvote: user {} has no vote on post {}", user.id, id);
                    return Err(StoreError::NotFound(Resource::Vote));
                }
                (_, Some(idx)) => post.votes[idx].direction = direction,
                (_, None) => post.votes.push(Vote {
                    post_id: id,
                    user_id: user.id,
                    direction,
                }),
            }

            recount(post);
            Ok(post.clone())
        })?;

        info!(
            "Vote {:?} by user {} on post {}: score {}",
            direction, user.id, id, post.score
        );
        Ok(post)
    }

    pub fn delete(&self, id: u32) -> Result<bool> {
        self.table.with_write(|table| {
            let idx = table.position(id).inspect_err(|_| {
                warn!("delete: no post {}", id);
            })?;
            table.posts.remove(idx);
            Ok(())
        })?;

        info!("Deleted post {}", id);
        Ok(true)
    }

    fn collect_sorted<F>(&self, keep: F) -> Result<Vec<Post>>
    where
        F: Fn(&Post) -> bool,
    {
        let mut posts = self.table.with_read(|table| {
            Ok(table
                .posts
                .iter()
                .filter(|p| keep(p))
                .cloned()
                .collect::<Vec<_>>())
        })?;
        sort_by_score(&mut posts);
        Ok(posts)
    }
}
