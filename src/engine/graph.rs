use crate::engine::timeline::{Post, Timeline};
use std::collections::HashMap;

#[derive(Debug, Eq, PartialEq)]
pub enum InitializeOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum FollowError {
    #[error("user '{0}' does not exist")]
    NotFound(String),
    #[error("a user cannot follow themselves")]
    SelfFollow,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum UnfollowError {
    #[error("user '{0}' does not exist")]
    NotFound(String),
    #[error("a user cannot unfollow themselves")]
    SelfUnfollow,
    #[error("not following that user")]
    NotFollowing,
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ListError {
    #[error("user '{0}' does not exist")]
    NotFound(String),
    #[error("all-users sequence is shorter than a follower list")]
    Corrupted,
}

struct UserRecord {
    followers: Vec<String>,
    following: Vec<String>,
    posts: Vec<Post>,
    timeline: Timeline,
}

impl UserRecord {
    fn new(username: &str) -> Self {
        // Every user follows and is followed by themselves from creation.
        UserRecord {
            followers: vec![username.to_string()],
            following: vec![username.to_string()],
            posts: Vec::new(),
            timeline: Timeline::default(),
        }
    }
}

/// In-memory store of users, follow edges, authored posts, and per-user
/// delivery backlogs. Pure logic, no networking, no locking. Concurrency
/// control is the engine actor's job.
#[derive(Default)]
pub struct SocialGraph {
    users: HashMap<String, UserRecord>,
    // Creation order. Drives the global listing.
    all_users: Vec<String>,
}

impl SocialGraph {
    pub fn initialize(&mut self, username: &str) -> InitializeOutcome {
        if self.users.contains_key(username) {
            return InitializeOutcome::AlreadyExists;
        }

        self.users.insert(username.to_string(), UserRecord::new(username));
        self.all_users.push(username.to_string());
        InitializeOutcome::Created
    }

    /// Adds the follow edge and backfills the follower's timeline with the
    /// target's entire post history, oldest first. Re-following someone is a
    /// silent no-op so the edge lists never hold duplicates.
    pub fn follow(&mut self, from: &str, to: &str) -> Result<(), FollowError> {
        if !self.users.contains_key(to) {
            return Err(FollowError::NotFound(to.to_string()));
        }
        if from == to {
            return Err(FollowError::SelfFollow);
        }
        let follower = self
            .users
            .get(from)
            .ok_or_else(|| FollowError::NotFound(from.to_string()))?;
        if follower.following.iter().any(|u| u == to) {
            return Ok(());
        }

        self.users.get_mut(from).unwrap().following.push(to.to_string());
        self.users.get_mut(to).unwrap().followers.push(from.to_string());

        let backfill: Vec<Post> = self.users.get(to).unwrap().posts.clone();
        let follower = self.users.get_mut(from).unwrap();
        for post in backfill {
            follower.timeline.push(post);
        }

        Ok(())
    }

    pub fn unfollow(&mut self, from: &str, to: &str) -> Result<(), UnfollowError> {
        if !self.users.contains_key(to) {
            return Err(UnfollowError::NotFound(to.to_string()));
        }
        if from == to {
            return Err(UnfollowError::SelfUnfollow);
        }
        let follower = self
            .users
            .get(from)
            .ok_or_else(|| UnfollowError::NotFound(from.to_string()))?;
        if !follower.following.iter().any(|u| u == to) {
            return Err(UnfollowError::NotFollowing);
        }

        self.users.get_mut(from).unwrap().following.retain(|u| u != to);
        self.users.get_mut(to).unwrap().followers.retain(|u| u != from);
        Ok(())
    }

    /// Returns the requesting user's followers and the global all-users
    /// sequence in creation order. The all-users sequence being shorter than
    /// a follower list means the data model has drifted; that is reported as
    /// a distinct corruption fault, not a normal error.
    pub fn list(&self, username: &str) -> Result<(Vec<String>, Vec<String>), ListError> {
        let user = self
            .users
            .get(username)
            .ok_or_else(|| ListError::NotFound(username.to_string()))?;

        if self.all_users.len() < user.followers.len() {
            return Err(ListError::Corrupted);
        }

        Ok((user.followers.clone(), self.all_users.clone()))
    }

    /// Appends to the author's post history and fans the post out into every
    /// current follower's timeline, self excluded. Unknown authors are
    /// ignored; the RPC layer only posts for initialized users.
    pub fn post(&mut self, author: &str, timestamp: &str, content: &str) {
        let followers: Vec<String> = match self.users.get(author) {
            Some(user) => user.followers.clone(),
            None => return,
        };

        let post = Post {
            author: author.to_string(),
            timestamp: timestamp.to_string(),
            content: content.to_string(),
        };

        self.users.get_mut(author).unwrap().posts.push(post.clone());
        for follower in followers {
            if follower == author {
                continue;
            }
            if let Some(record) = self.users.get_mut(&follower) {
                record.timeline.push(post.clone());
            }
        }
    }

    /// Destructively drains the user's backlog, oldest first. A user is never
    /// handed their own posts back.
    pub fn drain_timeline(&mut self, username: &str) -> Vec<Post> {
        match self.users.get_mut(username) {
            Some(record) => record
                .timeline
                .drain()
                .into_iter()
                .filter(|post| post.author != username)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn usernames_in_creation_order(&self) -> &[String] {
        &self.all_users
    }

    #[cfg(test)]
    pub(crate) fn followers_of(&self, username: &str) -> Vec<String> {
        self.users.get(username).map(|u| u.followers.clone()).unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn following_of(&self, username: &str) -> Vec<String> {
        self.users.get(username).map(|u| u.following.clone()).unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn posts_of(&self, username: &str) -> Vec<Post> {
        self.users.get(username).map(|u| u.posts.clone()).unwrap_or_default()
    }
}
