use std::collections::VecDeque;

/// Max number of posts buffered per user. Insertion past capacity evicts the
/// oldest entry first.
pub const TIMELINE_CAPACITY: usize = 20;

/// A single authored post. Immutable once created; the authoritative copy
/// lives in the author's post history, timelines only hold fanned-out copies.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Post {
    pub author: String,
    pub timestamp: String,
    pub content: String,
}

/// Bounded FIFO backlog of posts awaiting delivery to one user.
#[derive(Default)]
pub struct Timeline {
    entries: VecDeque<Post>,
}

impl Timeline {
    pub fn push(&mut self, post: Post) {
        if self.entries.len() == TIMELINE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(post);
    }

    /// Empties the backlog, returning it oldest-first.
    pub fn drain(&mut self) -> Vec<Post> {
        self.entries.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(n: usize) -> Post {
        Post {
            author: "alice".to_string(),
            timestamp: format!("t{}", n),
            content: format!("post {}", n),
        }
    }

    #[test]
    fn drain_returns_oldest_first_and_empties() {
        let mut timeline = Timeline::default();
        timeline.push(post(1));
        timeline.push(post(2));
        timeline.push(post(3));

        let drained = timeline.drain();
        assert_eq!(drained, vec![post(1), post(2), post(3)]);
        assert!(timeline.drain().is_empty());
    }

    #[test]
    fn push_past_capacity_evicts_oldest() {
        let mut timeline = Timeline::default();
        for n in 0..TIMELINE_CAPACITY + 5 {
            timeline.push(post(n));
        }

        let drained = timeline.drain();
        assert_eq!(drained.len(), TIMELINE_CAPACITY);
        assert_eq!(drained.first(), Some(&post(5)));
        assert_eq!(drained.last(), Some(&post(TIMELINE_CAPACITY + 4)));
    }
}
