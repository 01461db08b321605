//! History store: the message log as a pretty-printed JSON array.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::Error as _;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::Message;
use crate::error::HistoryError;

/// Outcome of reading the store.
#[derive(Debug)]
pub enum StoreLoad {
    /// The store held a valid message array.
    Loaded(Vec<Message>),
    /// No store file exists yet.
    Missing,
    /// The store exists but its content is not a valid message log.
    Malformed(serde_json::Error),
}

/// File-backed history store, read and written wholesale.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store. Only I/O failures other than "not found" are errors.
    pub fn load(&self) -> Result<StoreLoad, HistoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreLoad::Missing),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Ok(StoreLoad::Malformed(serde_json::Error::io(e)));
            }
            Err(e) => return Err(e.into()),
        };

        let messages = match serde_json::from_str::<Vec<Message>>(&content) {
            Ok(messages) => messages,
            Err(e) => return Ok(StoreLoad::Malformed(e)),
        };
        if let Some(index) = stray_system_index(&messages) {
            return Ok(StoreLoad::Malformed(serde_json::Error::custom(format!(
                "system message at index {index}; only index 0 may hold one"
            ))));
        }

        debug!(
            path = %self.path.display(),
            messages = messages.len(),
            "Loaded conversation history"
        );
        Ok(StoreLoad::Loaded(messages))
    }

    /// Overwrite the store with `messages`.
    ///
    /// Writes to a temp file next to the store and renames it into place.
    pub fn save(&self, messages: &[Message]) -> Result<(), HistoryError> {
        let json = to_json_pretty(messages)?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !parent.exists() {
            fs::create_dir_all(&parent)?;
        }

        let temp_path = parent.join(format!(
            ".{}.tmp.{}",
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("history"),
            std::process::id()
        ));

        {
            let mut temp_file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            temp_file.write_all(json.as_bytes())?;
            temp_file.sync_all()?;
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(
            path = %self.path.display(),
            messages = messages.len(),
            "Saved conversation history"
        );
        Ok(())
    }
}

/// Position of the first system message past index 0.
fn stray_system_index(messages: &[Message]) -> Option<usize> {
    messages
        .iter()
        .skip(1)
        .position(Message::is_system)
        .map(|i| i + 1)
}

/// Serialize with four-space indentation.
fn to_json_pretty(messages: &[Message]) -> Result<String, HistoryError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    messages.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_missing_store() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nope.json"));
        assert!(matches!(store.load().unwrap(), StoreLoad::Missing));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let messages = vec![
            Message::system("Be sassy."),
            Message::user("Hi"),
            Message::assistant("What now?"),
        ];
        store.save(&messages).unwrap();

        match store.load().unwrap() {
            StoreLoad::Loaded(loaded) => assert_eq!(loaded, messages),
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn test_saved_format_is_indented() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = HistoryStore::new(&path);
        store.save(&[Message::system("S")]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            "[\n    {\n        \"role\": \"system\",\n        \"content\": \"S\"\n    }\n]"
        );
    }

    #[test]
    fn test_save_creates_parent_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let store = HistoryStore::new(&path);
        store
            .save(&[Message::system("S"), Message::user("one")])
            .unwrap();
        store.save(&[Message::system("S")]).unwrap();

        match store.load().unwrap() {
            StoreLoad::Loaded(loaded) => assert_eq!(loaded.len(), 1),
            other => panic!("unexpected load result: {other:?}"),
        }
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_malformed_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = HistoryStore::new(&path);

        for content in [
            "not json at all",
            r#"{"role": "user", "content": "not an array"}"#,
            r#"[{"role": "wizard", "content": "bad role"}]"#,
            r#"[{"role": "user"}]"#,
            r#"[{"role": "user", "content": "q"}, {"role": "system", "content": "stray"}, {"role": "assistant", "content": "a"}]"#,
            r#"[{"role": "system", "content": "one"}, {"role": "system", "content": "two"}]"#,
        ] {
            fs::write(&path, content).unwrap();
            assert!(
                matches!(store.load().unwrap(), StoreLoad::Malformed(_)),
                "expected malformed for {content}"
            );
        }
    }

    #[test]
    fn test_history_without_system_entry_loads() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let messages = vec![Message::user("q"), Message::assistant("a")];
        store.save(&messages).unwrap();

        match store.load().unwrap() {
            StoreLoad::Loaded(loaded) => assert_eq!(loaded, messages),
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn test_non_utf8_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let store = HistoryStore::new(&path);
        assert!(matches!(store.load().unwrap(), StoreLoad::Malformed(_)));
    }

    #[test]
    fn test_directory_is_read_error() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        assert!(store.load().is_err());
    }

    #[test]
    fn test_save_into_directory_path_fails() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        assert!(store.save(&[Message::system("S")]).is_err());
    }
}
