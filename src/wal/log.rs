use crate::engine::SocialGraph;
use crate::wal::entry::LogEntry;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum WalError {
    #[error("write-ahead log IO failure")]
    Io(#[from] std::io::Error),
}

/// Append-only mutation log for one server instance. Writes are synchronous
/// line appends with a flush but no fsync contract; the log survives restarts
/// of the same instance and is never shipped between instances.
pub struct WriteAheadLog {
    file: File,
}

impl WriteAheadLog {
    pub fn append(&mut self, entry: &LogEntry) -> Result<(), WalError> {
        writeln!(self.file, "{}", entry)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Boot-time recovery. Replays the previous log (if any) strictly in file
/// order into a fresh engine, then truncates the file and re-seeds it with
/// one `INITIALIZE` line per known user. That compaction intentionally drops
/// follow/post history for pre-existing users; only the user set carries
/// over to the next restart's replay.
pub fn recover<P: AsRef<Path>>(path: P, logger: &slog::Logger) -> Result<(SocialGraph, WriteAheadLog), WalError> {
    let path = path.as_ref();
    let mut graph = SocialGraph::default();

    match File::open(path) {
        Ok(previous_log) => {
            replay(&mut graph, previous_log, logger);
            slog::info!(
                logger,
                "Recovered {} users from '{}'",
                graph.usernames_in_creation_order().len(),
                path.display()
            );
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            slog::info!(logger, "No previous log at '{}', starting fresh", path.display());
        }
        Err(e) => return Err(WalError::Io(e)),
    }

    let file = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
    let mut wal = WriteAheadLog { file };

    for username in graph.usernames_in_creation_order().to_vec() {
        wal.append(&LogEntry::Initialize(username))?;
    }

    Ok((graph, wal))
}

// Replay goes through the same engine operations as the live handlers, so
// fan-out, backfill, and capacity eviction are reproduced exactly. Lines that
// don't parse or that reference users the log never initialized are skipped.
fn replay(graph: &mut SocialGraph, previous_log: File, logger: &slog::Logger) {
    let reader = BufReader::new(previous_log);
    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                slog::warn!(logger, "Stopping replay at unreadable line {}: {}", line_no + 1, e);
                return;
            }
        };
        if line.is_empty() {
            continue;
        }

        let entry = match LogEntry::parse(&line) {
            Some(entry) => entry,
            None => {
                slog::warn!(logger, "Skipping malformed log line {}: '{}'", line_no + 1, line);
                continue;
            }
        };

        match entry {
            LogEntry::Initialize(username) => {
                graph.initialize(&username);
            }
            LogEntry::Follow { from, to } => {
                if let Err(e) = graph.follow(&from, &to) {
                    slog::warn!(logger, "Skipping unreplayable FOLLOW at line {}: {}", line_no + 1, e);
                }
            }
            LogEntry::Unfollow { from, to } => {
                if let Err(e) = graph.unfollow(&from, &to) {
                    slog::warn!(logger, "Skipping unreplayable UNFOLLOW at line {}: {}", line_no + 1, e);
                }
            }
            LogEntry::Post {
                author,
                timestamp,
                content,
            } => {
                graph.post(&author, &timestamp, &content);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::path::PathBuf;

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn temp_log_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("feedmesh-wal-{}-{}.log", name, std::process::id()));
        path
    }

    fn read_lines(path: &Path) -> Vec<String> {
        let mut raw = String::new();
        File::open(path).unwrap().read_to_string(&mut raw).unwrap();
        raw.lines().map(str::to_string).collect()
    }

    #[test]
    fn recover_without_previous_log_starts_empty() {
        let path = temp_log_path("fresh");
        let _ = std::fs::remove_file(&path);

        let (graph, _wal) = recover(&path, &test_logger()).unwrap();

        assert!(graph.usernames_in_creation_order().is_empty());
        assert!(read_lines(&path).is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn replay_matches_live_execution() {
        let path = temp_log_path("replay");
        std::fs::write(
            &path,
            "INITIALIZE alice\nINITIALIZE bob\nFOLLOW bob|alice\nPOST alice|t|x\n",
        )
        .unwrap();

        let (mut replayed, _wal) = recover(&path, &test_logger()).unwrap();

        let mut live = SocialGraph::default();
        live.initialize("alice");
        live.initialize("bob");
        live.follow("bob", "alice").unwrap();
        live.post("alice", "t", "x");

        assert_eq!(replayed.followers_of("alice"), live.followers_of("alice"));
        assert_eq!(replayed.following_of("bob"), live.following_of("bob"));
        assert_eq!(replayed.posts_of("alice"), live.posts_of("alice"));
        assert_eq!(replayed.drain_timeline("bob"), live.drain_timeline("bob"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn recovery_compacts_log_to_initialize_lines() {
        let path = temp_log_path("compact");
        std::fs::write(
            &path,
            "INITIALIZE alice\nINITIALIZE bob\nFOLLOW bob|alice\nPOST alice|t|x\nUNFOLLOW bob|alice\n",
        )
        .unwrap();

        let (_graph, _wal) = recover(&path, &test_logger()).unwrap();

        assert_eq!(read_lines(&path), vec!["INITIALIZE alice", "INITIALIZE bob"]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_and_unreplayable_lines_are_skipped() {
        let path = temp_log_path("malformed");
        std::fs::write(
            &path,
            "INITIALIZE alice\ngarbage line\nFOLLOW alice|ghost\nINITIALIZE bob\n",
        )
        .unwrap();

        let (graph, _wal) = recover(&path, &test_logger()).unwrap();

        assert_eq!(
            graph.usernames_in_creation_order(),
            &["alice".to_string(), "bob".to_string()]
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn appends_survive_a_second_recovery() {
        let path = temp_log_path("reopen");
        let _ = std::fs::remove_file(&path);

        let (_graph, mut wal) = recover(&path, &test_logger()).unwrap();
        wal.append(&LogEntry::Initialize("alice".to_string())).unwrap();
        wal.append(&LogEntry::Initialize("bob".to_string())).unwrap();
        wal.append(&LogEntry::Follow {
            from: "bob".to_string(),
            to: "alice".to_string(),
        })
        .unwrap();
        drop(wal);

        let (graph, _wal) = recover(&path, &test_logger()).unwrap();
        assert_eq!(
            graph.usernames_in_creation_order(),
            &["alice".to_string(), "bob".to_string()]
        );
        assert_eq!(graph.followers_of("alice"), vec!["alice".to_string(), "bob".to_string()]);
        let _ = std::fs::remove_file(&path);
    }
}
