//! Inbox access for email intake.
//!
//! Mail is read from a Maildir that an external fetcher keeps in sync.
//! Unseen messages live in `new/`, or in `cur/` without the `S` flag.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

const SEEN_FLAG: char = 'S';
const INFO_SEPARATOR: &str = ":2,";

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown message id '{0}'")]
    UnknownMessage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxMessage {
    pub id: String,
    pub subject: String,
    pub body: String,
}

pub trait Mailbox {
    fn unseen(&self) -> Result<Vec<InboxMessage>, MailboxError>;

    fn mark_seen(&self, id: &str) -> Result<(), MailboxError>;
}

#[derive(Debug, Clone)]
pub struct MaildirInbox {
    root: PathBuf,
}

impl MaildirInbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> MailboxError + '_ {
        move |source| MailboxError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// File names under `sub`, sorted. A missing directory reads as empty.
    fn entries(&self, sub: &str) -> Result<Vec<String>, MailboxError> {
        let dir = self.root.join(sub);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(Self::io_error(&dir))? {
            let entry = entry.map_err(Self::io_error(&dir))?;
            let is_file = entry
                .file_type()
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, id: String) -> Result<InboxMessage, MailboxError> {
        let path = self.root.join(&id);
        let bytes = fs::read(&path).map_err(Self::io_error(&path))?;
        let raw = String::from_utf8_lossy(&bytes);
        let (subject, body) = parse_message(&raw);
        Ok(InboxMessage { id, subject, body })
    }
}

impl Mailbox for MaildirInbox {
    fn unseen(&self) -> Result<Vec<InboxMessage>, MailboxError> {
        let mut ids: Vec<String> = self
            .entries("new")?
            .into_iter()
            .map(|name| format!("new/{name}"))
            .collect();
        ids.extend(
            self.entries("cur")?
                .into_iter()
                .filter(|name| !flags(name).contains(SEEN_FLAG))
                .map(|name| format!("cur/{name}")),
        );

        let mut messages = Vec::with_capacity(ids.len());
        for id in ids {
            match self.load(id) {
                Ok(message) => messages.push(message),
                Err(error) => tracing::warn!(%error, "skipping unreadable message"),
            }
        }
        Ok(messages)
    }

    fn mark_seen(&self, id: &str) -> Result<(), MailboxError> {
        let (folder, name) = id
            .split_once('/')
            .filter(|(_, name)| !name.is_empty() && !name.contains('/'))
            .ok_or_else(|| MailboxError::UnknownMessage(id.to_string()))?;
        let seen_name = match folder {
            "new" => format!("{}{INFO_SEPARATOR}{SEEN_FLAG}", base_name(name)),
            "cur" => with_seen_flag(name),
            _ => return Err(MailboxError::UnknownMessage(id.to_string())),
        };

        let from = self.root.join(id);
        if !from.is_file() {
            return Err(MailboxError::UnknownMessage(id.to_string()));
        }
        let cur = self.root.join("cur");
        fs::create_dir_all(&cur).map_err(Self::io_error(&cur))?;
        let to = cur.join(seen_name);
        fs::rename(&from, &to).map_err(Self::io_error(&from))
    }
}

fn base_name(name: &str) -> &str {
    name.split_once(INFO_SEPARATOR)
        .map(|(base, _)| base)
        .unwrap_or(name)
}

fn flags(name: &str) -> &str {
    name.split_once(INFO_SEPARATOR)
        .map(|(_, flags)| flags)
        .unwrap_or("")
}

/// Maildir flags are kept in ASCII order.
fn with_seen_flag(name: &str) -> String {
    let mut flags: Vec<char> = flags(name).chars().collect();
    if !flags.contains(&SEEN_FLAG) {
        flags.push(SEEN_FLAG);
        flags.sort_unstable();
    }
    let flags: String = flags.into_iter().collect();
    format!("{}{INFO_SEPARATOR}{flags}", base_name(name))
}

/// Split an RFC 822 message into its Subject and body.
///
/// Folded header lines are joined with a single space. A message with no
/// blank separator line is treated as headers only.
pub fn parse_message(raw: &str) -> (String, String) {
    let raw = raw.replace("\r\n", "\n");
    let (head, body) = match raw.split_once("\n\n") {
        Some((head, body)) => (head.to_string(), body.to_string()),
        None => (raw.clone(), String::new()),
    };

    let mut headers: Vec<(String, String)> = Vec::new();
    for line in head.lines() {
        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let subject = headers
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("subject"))
        .map(|(_, value)| value)
        .unwrap_or_default();
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maildir() -> (tempfile::TempDir, MaildirInbox) {
        let dir = tempfile::tempdir().expect("temp dir");
        for sub in ["new", "cur", "tmp"] {
            fs::create_dir_all(dir.path().join(sub)).expect("maildir folder");
        }
        let inbox = MaildirInbox::new(dir.path());
        (dir, inbox)
    }

    fn deliver(inbox: &MaildirInbox, path: &str, raw: &str) {
        fs::write(inbox.root().join(path), raw).expect("message written");
    }

    #[test]
    fn parses_folded_subject_and_crlf_body() {
        let raw = "From: site@example.com\r\nSubject: New contact\r\n  from website\r\n\r\nName: Ana\r\n";
        let (subject, body) = parse_message(raw);
        assert_eq!(subject, "New contact from website");
        assert_eq!(body, "Name: Ana\n");
    }

    #[test]
    fn message_without_subject_has_empty_subject() {
        let (subject, body) = parse_message("From: a@b.c\n\nhello");
        assert_eq!(subject, "");
        assert_eq!(body, "hello");
    }

    #[test]
    fn unseen_lists_new_and_unflagged_cur_messages() {
        let (_dir, inbox) = maildir();
        deliver(&inbox, "new/1700.a.host", "Subject: one\n\nbody one");
        deliver(&inbox, "cur/1600.b.host:2,", "Subject: two\n\nbody two");
        deliver(&inbox, "cur/1500.c.host:2,RS", "Subject: old\n\nread already");

        let messages = inbox.unseen().expect("inbox readable");
        let subjects: Vec<&str> = messages.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["one", "two"]);
    }

    #[test]
    fn mark_seen_moves_new_message_into_cur_with_flag() {
        let (_dir, inbox) = maildir();
        deliver(&inbox, "new/1700.a.host", "Subject: one\n\nbody");

        inbox.mark_seen("new/1700.a.host").expect("mark seen");

        assert!(!inbox.root().join("new/1700.a.host").exists());
        assert!(inbox.root().join("cur/1700.a.host:2,S").exists());
        assert!(inbox.unseen().expect("inbox readable").is_empty());
    }

    #[test]
    fn mark_seen_keeps_existing_flags_sorted() {
        let (_dir, inbox) = maildir();
        deliver(&inbox, "cur/1600.b.host:2,RT", "Subject: two\n\nbody");

        inbox.mark_seen("cur/1600.b.host:2,RT").expect("mark seen");

        assert!(inbox.root().join("cur/1600.b.host:2,RST").exists());
    }

    #[test]
    fn mark_seen_rejects_unknown_ids() {
        let (_dir, inbox) = maildir();
        assert!(matches!(
            inbox.mark_seen("new/missing"),
            Err(MailboxError::UnknownMessage(_))
        ));
        assert!(matches!(
            inbox.mark_seen("new/../../outside"),
            Err(MailboxError::UnknownMessage(_))
        ));
    }

    #[test]
    fn missing_maildir_reads_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let inbox = MaildirInbox::new(dir.path().join("absent"));
        assert!(inbox.unseen().expect("empty inbox").is_empty());
    }
}
