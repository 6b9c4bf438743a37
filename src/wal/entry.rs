use std::fmt;

/// One durable mutation. The append-only text log is the sole durable
/// representation of state; there is no snapshot format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LogEntry {
    Initialize(String),
    Follow { from: String, to: String },
    Unfollow { from: String, to: String },
    Post {
        author: String,
        timestamp: String,
        content: String,
    },
}

impl LogEntry {
    /// Parses one log line. Returns None for lines that don't carry a known
    /// tag or are missing fields; recovery skips those with a warning.
    pub fn parse(line: &str) -> Option<LogEntry> {
        let (tag, rest) = line.split_once(' ')?;
        match tag {
            "INITIALIZE" => Some(LogEntry::Initialize(rest.to_string())),
            "FOLLOW" => {
                let (from, to) = rest.split_once('|')?;
                Some(LogEntry::Follow {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
            "UNFOLLOW" => {
                let (from, to) = rest.split_once('|')?;
                Some(LogEntry::Unfollow {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
            "POST" => {
                let mut fields = rest.splitn(3, '|');
                let author = fields.next()?;
                let timestamp = fields.next()?;
                let content = fields.next()?;
                Some(LogEntry::Post {
                    author: author.to_string(),
                    timestamp: timestamp.to_string(),
                    content: content.to_string(),
                })
            }
            _ => None,
        }
    }
}

// One line per entry. Embedded newlines would corrupt the line framing, so
// they are flattened to spaces on the way out.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Initialize(user) => write!(f, "INITIALIZE {}", flatten(user)),
            LogEntry::Follow { from, to } => write!(f, "FOLLOW {}|{}", flatten(from), flatten(to)),
            LogEntry::Unfollow { from, to } => write!(f, "UNFOLLOW {}|{}", flatten(from), flatten(to)),
            LogEntry::Post {
                author,
                timestamp,
                content,
            } => write!(f, "POST {}|{}|{}", flatten(author), flatten(timestamp), flatten(content)),
        }
    }
}

fn flatten(field: &str) -> String {
    field.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_tag() {
        assert_eq!(
            LogEntry::parse("INITIALIZE alice"),
            Some(LogEntry::Initialize("alice".to_string()))
        );
        assert_eq!(
            LogEntry::parse("FOLLOW bob|alice"),
            Some(LogEntry::Follow {
                from: "bob".to_string(),
                to: "alice".to_string(),
            })
        );
        assert_eq!(
            LogEntry::parse("UNFOLLOW bob|alice"),
            Some(LogEntry::Unfollow {
                from: "bob".to_string(),
                to: "alice".to_string(),
            })
        );
    }

    #[test]
    fn post_content_may_contain_delimiter() {
        let parsed = LogEntry::parse("POST alice|t1|a|b|c");
        assert_eq!(
            parsed,
            Some(LogEntry::Post {
                author: "alice".to_string(),
                timestamp: "t1".to_string(),
                content: "a|b|c".to_string(),
            })
        );
    }

    #[test]
    fn unknown_or_truncated_lines_are_rejected() {
        assert_eq!(LogEntry::parse("NOPE alice"), None);
        assert_eq!(LogEntry::parse("FOLLOW alice"), None);
        assert_eq!(LogEntry::parse("POST alice|t1"), None);
        assert_eq!(LogEntry::parse(""), None);
    }

    #[test]
    fn display_flattens_newlines() {
        let entry = LogEntry::Post {
            author: "alice".to_string(),
            timestamp: "t1".to_string(),
            content: "line one\nline two".to_string(),
        };

        assert_eq!(entry.to_string(), "POST alice|t1|line one line two");
    }
}
