use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use linkboard_types::models::{Comment, NewComment};

use crate::{Resource, Result, StoreError, Table};

#[derive(Default)]
struct CommentTable {
    /// Last issued comment ID per post. Never decremented.
    last_id: HashMap<u32, u32>,
    by_post: HashMap<u32, Vec<Comment>>,
}

/// Comments grouped by post, in insertion order. Posts reference their
/// comments only by ID; callers join the two at read time.
#[derive(Default)]
pub struct CommentStore {
    table: Table<CommentTable>,
}

impl CommentStore {
    pub fn new() -> Self {
        info!("Comment store created");
        Self::default()
    }

    pub fn create(&self, comment: NewComment) -> Result<u32> {
        let post_id = comment.post_id;

        let id = self.table.with_write(|table| {
            let last_id = table.last_id.entry(post_id).or_default();
            *last_id += 1;
            let id = *last_id;

            table.by_post.entry(post_id).or_default().push(Comment {
                id,
                post_id,
                author: comment.author,
                created_at: Utc::now(),
                body: comment.body,
            });
            Ok(id)
        })?;

        info!("Created comment {} on post {}", id, post_id);
        Ok(id)
    }

    /// Comments on one post. An unknown post simply has none.
    pub fn read_all(&self, post_id: u32) -> Result<Vec<Comment>> {
        debug!("List comments, post {}", post_id);
        self.table
            .with_read(|table| Ok(table.by_post.get(&post_id).cloned().unwrap_or_default()))
    }

    pub fn read(&self, post_id: u32, comment_id: u32) -> Result<Comment> {
        self.table.with_read(|table| {
            table
                .by_post
                .get(&post_id)
                .and_then(|comments| comments.iter().find(|c| c.id == comment_id))
                .cloned()
                .ok_or(StoreError::NotFound(Resource::Comment))
        })
    }

    /// Snapshot of every post's comments, for joining against a post list.
    pub fn list(&self) -> Result<HashMap<u32, Vec<Comment>>> {
        debug!("List comments");
        self.table.with_read(|table| Ok(table.by_post.clone()))
    }

    pub fn delete(&self, post_id: u32, comment_id: u32) -> Result<bool> {
        self.table.with_write(|table| {
            let position = table
                .by_post
                .get(&post_id)
                .and_then(|comments| comments.iter().position(|c| c.id == comment_id));

            match (position, table.by_post.get_mut(&post_id)) {
                (Some(idx), Some(comments)) => {
                    comments.remove(idx);
                    Ok(())
                }
                _ => {
                    warn!("Comment delete: no comment {} on post {}", comment_id, post_id);
                    Err(StoreError::NotFound(Resource::Comment))
                }
            }
        })?;

        info!("Deleted comment {} on post {}", comment_id, post_id);
        Ok(true)
    }

    /// Drops every comment on a deleted post. The post's ID counter stays,
    /// so a comment ID is never issued twice for the same post.
    pub fn delete_post(&self, post_id: u32) -> Result<usize> {
        let removed = self.table.with_write(|table| {
            Ok(table.by_post.remove(&post_id).map_or(0, |comments| comments.len()))
        })?;

        info!("Removed {} comments of deleted post {}", removed, post_id);
        Ok(removed)
    }
}
