use super::catalog::Catalog;
use super::DataStore;
use crate::error::{Result, ShelfError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const DATA_FILENAME: &str = "data.json";

pub struct FileStore {
    root: PathBuf,
    media_dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `root`, with blobs in `root/files`.
    pub fn new(root: PathBuf) -> Self {
        let media_dir = root.join("files");
        Self { root, media_dir }
    }

    pub fn with_media_dir(mut self, media_dir: PathBuf) -> Self {
        self.media_dir = media_dir;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(ShelfError::Io)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Catalog> {
        let data_file = self.root.join(DATA_FILENAME);
        if !data_file.exists() {
            return Ok(Catalog::default());
        }
        let content = fs::read_to_string(&data_file).map_err(ShelfError::Io)?;
        let catalog = serde_json::from_str(&content).map_err(ShelfError::Serialization)?;
        debug!(path = %data_file.display(), "catalog loaded");
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let data_file = self.root.join(DATA_FILENAME);
        let content = serde_json::to_string_pretty(catalog).map_err(ShelfError::Serialization)?;

        // Write to a temp file first so a crash never leaves half a catalog.
        let tmp_file = self.root.join(format!(".data-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(ShelfError::Io)?;
        fs::rename(&tmp_file, &data_file).map_err(ShelfError::Io)?;
        debug!(path = %data_file.display(), "catalog saved");
        Ok(())
    }
}

impl DataStore for FileStore {
    fn read<T>(&self, f: impl FnOnce(&Catalog) -> Result<T>) -> Result<T> {
        let catalog = self.load()?;
        f(&catalog)
    }

    fn write<T>(&mut self, f: impl FnOnce(&mut Catalog) -> Result<T>) -> Result<T> {
        let mut catalog = self.load()?;
        let out = f(&mut catalog)?;
        self.save(&catalog)?;
        Ok(out)
    }

    fn put_blob(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(&self.media_dir)?;
        let path = self.media_dir.join(name);
        let tmp_path = self.media_dir.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, bytes).map_err(ShelfError::Io)?;
        fs::rename(&tmp_path, &path).map_err(ShelfError::Io)?;
        debug!(path = %path.display(), size = bytes.len(), "blob written");
        Ok(())
    }

    fn get_blob(&self, name: &str) -> Result<Vec<u8>> {
        match fs::read(self.media_dir.join(name)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ShelfError::not_found("blob", name)),
            Err(e) => Err(ShelfError::Io(e)),
        }
    }

    fn delete_blob(&mut self, name: &str) -> Result<()> {
        let path = self.media_dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ShelfError::not_found("blob", name)),
            Err(e) => Err(ShelfError::Io(e)),
        }
    }

    fn blob_path(&self, name: &str) -> PathBuf {
        self.media_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Genre, Named};
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn empty_root_reads_as_empty_catalog() {
        let (_dir, store) = setup();
        let count = store.read(|c| Ok(c.genres.len())).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn writes_persist_across_instances() {
        let (dir, mut store) = setup();
        store
            .write(|c| c.insert(Genre::with_name("Satire".into())))
            .unwrap();

        let reopened = FileStore::new(dir.path().to_path_buf());
        let names = reopened
            .read(|c| Ok(c.list::<Genre>().into_iter().map(|g| g.slug).collect::<Vec<_>>()))
            .unwrap();
        assert_eq!(names, vec!["satire"]);
    }

    #[test]
    fn failed_write_leaves_data_untouched() {
        let (dir, mut store) = setup();
        store
            .write(|c| c.insert(Genre::with_name("Satire".into())))
            .unwrap();
        let before = fs::read_to_string(dir.path().join(DATA_FILENAME)).unwrap();

        let res = store.write(|c| c.insert(Genre::with_name("Satire".into())));
        assert!(matches!(res, Err(ShelfError::Uniqueness { .. })));

        let after = fs::read_to_string(dir.path().join(DATA_FILENAME)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn no_temp_files_are_left_behind() {
        let (dir, mut store) = setup();
        store
            .write(|c| c.insert(Genre::with_name("Satire".into())))
            .unwrap();
        store.put_blob("x.bin", b"123").unwrap();

        for dir in [dir.path().to_path_buf(), store.media_dir().to_path_buf()] {
            for entry in fs::read_dir(dir).unwrap() {
                let name = entry.unwrap().file_name().to_string_lossy().to_string();
                assert!(!name.ends_with(".tmp"), "leftover tmp file: {}", name);
            }
        }
    }

    #[test]
    fn blobs_live_in_media_dir() {
        let (dir, store) = setup();
        let media = dir.path().join("elsewhere");
        let mut store = FileStore::new(store.root().to_path_buf()).with_media_dir(media.clone());

        store.put_blob("cover.jpg", b"jpeg").unwrap();
        assert!(media.join("cover.jpg").exists());
        assert_eq!(store.get_blob("cover.jpg").unwrap(), b"jpeg");

        store.delete_blob("cover.jpg").unwrap();
        assert!(!media.join("cover.jpg").exists());
        assert!(matches!(
            store.get_blob("cover.jpg"),
            Err(ShelfError::NotFound { .. })
        ));
    }
}
