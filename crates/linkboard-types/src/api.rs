use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Author, Comment, Post, PostKind, Vote};

// -- JWT Claims --

/// Claims carried by a session token. `sessID` is the lookup key into the
/// server-side session table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: ClaimsUser,
    #[serde(rename = "sessID")]
    pub sess_id: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsUser {
    pub username: String,
    pub id: u32,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// -- Posts --

#[derive(Debug, Deserialize)]
pub struct NewPostRequest {
    pub category: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: PostKind,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Post body as it appears on the wire: `type` selects whether the payload
/// is under `text` or `url`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostBody {
    Text { text: String },
    Link { url: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: u32,
    pub score: i32,
    pub views: u32,
    #[serde(flatten)]
    pub body: PostBody,
    pub title: String,
    pub author: Author,
    pub category: String,
    pub created: DateTime<Utc>,
    pub comments: Vec<Comment>,
    pub upvote_percentage: u8,
    pub votes: Vec<Vote>,
}

impl PostResponse {
    pub fn new(post: Post, comments: Vec<Comment>) -> Self {
        let body = match post.kind {
            PostKind::Text => PostBody::Text { text: post.data },
            PostKind::Link => PostBody::Link { url: post.data },
        };

        Self {
            id: post.id,
            score: post.score,
            views: post.views,
            body,
            title: post.title,
            author: post.author,
            category: post.category,
            created: post.created_at,
            comments,
            upvote_percentage: post.upvote_percentage,
            votes: post.votes,
        }
    }
}

// -- Comments --

#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    #[serde(default)]
    pub comment: String,
}

// -- Generic replies --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub location: String,
    pub param: String,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteDirection;

    fn sample_post(kind: PostKind, data: &str) -> Post {
        Post {
            id: 4,
            title: "T".into(),
            category: "music".into(),
            kind,
            data: data.into(),
            author: Author {
                id: 1,
                username: "alice".into(),
            },
            created_at: Utc::now(),
            views: 2,
            score: 1,
            upvote_percentage: 100,
            votes: vec![Vote {
                post_id: 4,
                user_id: 1,
                direction: VoteDirection::Up,
            }],
        }
    }

    #[test]
    fn text_post_exposes_body_under_text() {
        let post = sample_post(PostKind::Text, "body");
        let json = serde_json::to_value(PostResponse::new(post, vec![])).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "body");
        assert!(json.get("url").is_none());
        assert!(json.get("data").is_none());
        assert_eq!(json["upvotePercentage"], 100);
        assert_eq!(json["votes"][0]["user"], 1);
    }

    #[test]
    fn link_post_exposes_body_under_url() {
        let json = serde_json::to_value(PostResponse::new(
            sample_post(PostKind::Link, "https://example.org"),
            vec![],
        ))
        .unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["url"], "https://example.org");
        assert!(json.get("text").is_none());
    }

    #[test]
    fn new_post_request_accepts_either_payload() {
        let req: NewPostRequest = serde_json::from_str(
            r#"{"category":"news","title":"t","type":"link","url":"https://x.test"}"#,
        )
        .unwrap();
        assert_eq!(req.kind, PostKind::Link);
        assert_eq!(req.url.as_deref(), Some("https://x.test"));
        assert!(req.text.is_none());
    }
}
