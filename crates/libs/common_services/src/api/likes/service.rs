use crate::api::likes::error::LikesError;
use common_types::MediaItem;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{info, warn};
use url::Url;

/// Outcome of a like request; duplicates are rejected, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Added,
    AlreadyLiked,
}

/// Append-only, deduplicated collection of liked items, persisted as one
/// JSON file. Every successful append rewrites the file synchronously via a
/// temp file + rename in the store's directory.
pub struct LikedStore {
    store_file: PathBuf,
    items: Mutex<Vec<MediaItem>>,
}

impl LikedStore {
    /// Loads the persisted collection. A missing file starts the store
    /// empty; a corrupt file is logged and also starts it empty, never a
    /// startup failure.
    #[must_use]
    pub fn load(store_file: PathBuf) -> Self {
        let items = match fs::read(&store_file) {
            Ok(bytes) => match serde_json::from_slice::<Vec<MediaItem>>(&bytes) {
                Ok(items) => {
                    info!(
                        "Loaded {} liked items from {}",
                        items.len(),
                        store_file.display()
                    );
                    items
                }
                Err(e) => {
                    warn!(
                        "Liked-items store at {} is corrupt ({e}), starting empty",
                        store_file.display()
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(
                    "Could not read liked-items store at {} ({e}), starting empty",
                    store_file.display()
                );
                Vec::new()
            }
        };

        Self {
            store_file,
            items: Mutex::new(items),
        }
    }

    /// Appends `item` unless a structurally equal item is already present.
    /// The collection is persisted before the append is acknowledged.
    pub fn like(&self, item: MediaItem) -> Result<LikeOutcome, LikesError> {
        validate(&item)?;

        let mut items = self.items.lock().map_err(|_| LikesError::LockPoisoned)?;
        if items.contains(&item) {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        items.push(item);
        if let Err(e) = persist(&self.store_file, &items) {
            items.pop();
            return Err(e);
        }
        Ok(LikeOutcome::Added)
    }

    #[must_use]
    pub fn items(&self) -> Vec<MediaItem> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

fn validate(item: &MediaItem) -> Result<(), LikesError> {
    if item.title.trim().is_empty() {
        return Err(LikesError::InvalidInput("title must not be empty".into()));
    }
    let embed = Url::parse(&item.embed_link)
        .map_err(|_| LikesError::InvalidInput("embed_link is not a valid URL".into()))?;
    if !matches!(embed.scheme(), "http" | "https") {
        return Err(LikesError::InvalidInput(
            "embed_link must be an http(s) URL".into(),
        ));
    }
    Ok(())
}

fn persist(store_file: &Path, items: &[MediaItem]) -> Result<(), LikesError> {
    let directory = match store_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(directory)?;
    serde_json::to_writer_pretty(&mut temp, items)?;
    temp.as_file().sync_all()?;
    temp.persist(store_file).map_err(|e| LikesError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_types::MediaSource;
    use tempfile::TempDir;

    fn item(title: &str) -> MediaItem {
        MediaItem {
            title: title.to_string(),
            embed_link: "https://www.youtube.com/embed/a1".to_string(),
            duration: "2:30".to_string(),
            thumbnail: "https://i.ytimg.com/vi/a1/mqdefault.jpg".to_string(),
            source: MediaSource::Video,
        }
    }

    fn store_in(dir: &TempDir) -> LikedStore {
        LikedStore::load(dir.path().join("liked.json"))
    }

    #[test]
    fn liking_twice_keeps_one_copy() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        assert_eq!(store.like(item("A")).expect("first"), LikeOutcome::Added);
        assert_eq!(
            store.like(item("A")).expect("second"),
            LikeOutcome::AlreadyLiked
        );
        assert_eq!(store.items(), vec![item("A")]);
    }

    #[test]
    fn likes_survive_a_reload() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("liked.json");

        let store = LikedStore::load(path.clone());
        store.like(item("A")).expect("like A");
        store.like(item("B")).expect("like B");

        let reloaded = LikedStore::load(path);
        assert_eq!(reloaded.items(), vec![item("A"), item("B")]);
    }

    #[test]
    fn corrupt_store_starts_empty() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("liked.json");
        fs::write(&path, b"{not json").expect("write corrupt file");

        let store = LikedStore::load(path);
        assert!(store.items().is_empty());
        // and it is still usable
        store.like(item("A")).expect("like after corruption");
    }

    #[test]
    fn rejects_items_without_a_title() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        let mut bad = item(" ");
        bad.title = "  ".to_string();
        assert!(matches!(
            store.like(bad),
            Err(LikesError::InvalidInput(_))
        ));
        assert!(store.items().is_empty());
    }

    #[test]
    fn rejects_malformed_embed_links() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        let mut bad = item("A");
        bad.embed_link = "not a url".to_string();
        assert!(matches!(
            store.like(bad),
            Err(LikesError::InvalidInput(_))
        ));

        let mut javascript = item("B");
        javascript.embed_link = "javascript:alert(1)".to_string();
        assert!(matches!(
            store.like(javascript),
            Err(LikesError::InvalidInput(_))
        ));
    }
}
