use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A registered account. The password is kept as given and never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u32,
    pub username: String,
    #[serde(skip)]
    pub password: String,
}

impl User {
    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Public identity attached to posts, comments and votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u32,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Link,
}

/// Fields supplied by the caller when creating a post. The store assigns the
/// rest.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub category: String,
    pub kind: PostKind,
    /// Body text for `PostKind::Text`, URL for `PostKind::Link`.
    pub data: String,
    pub author: Author,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub kind: PostKind,
    pub data: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub views: u32,
    pub score: i32,
    pub upvote_percentage: u8,
    pub votes: Vec<Vote>,
}

/// Tri-state vote value. `None` is never stored: it means "no standing vote".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    None,
    Down,
}

impl VoteDirection {
    pub fn value(self) -> i8 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::None => 0,
            VoteDirection::Down => -1,
        }
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            1 => Some(VoteDirection::Up),
            0 => Some(VoteDirection::None),
            -1 => Some(VoteDirection::Down),
            _ => None,
        }
    }
}

// Votes travel as 1 / 0 / -1 on the wire.
impl Serialize for VoteDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

impl<'de> Deserialize<'de> for VoteDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i8::deserialize(deserializer)?;
        VoteDirection::from_value(value)
            .ok_or_else(|| de::Error::custom(format!("invalid vote direction {}", value)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(skip)]
    pub post_id: u32,
    #[serde(rename = "user")]
    pub user_id: u32,
    #[serde(rename = "vote")]
    pub direction: VoteDirection,
}

/// Fields supplied by the caller when commenting on a post.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: u32,
    pub author: Author,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    /// Sequential within the owning post, starting at 1.
    pub id: u32,
    #[serde(skip)]
    pub post_id: u32,
    pub author: Author,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    pub body: String,
}
