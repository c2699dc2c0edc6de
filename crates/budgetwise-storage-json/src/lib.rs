use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use budgetwise_core::{
    storage::{decode_collection, encode_collection, KeyValueStore},
    CoreError,
};
use budgetwise_domain::BudgetCollection;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

const FILE_EXTENSION: &str = "json";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed key/value store writing one JSON file per key.
///
/// Overwriting a key first copies the previous file into
/// `<root>/backups/<key>/`, keeping the newest `retention` copies.
///
/// Keys double as file names, so reads and writes only accept keys that are
/// already canonical: lowercase ASCII letters, digits, `-` and `_`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    retention: usize,
}

/// Describes one backup file on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub key: String,
    /// File name of the backup, unique per key.
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: impl Into<PathBuf>, retention: usize) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            retention: retention.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Live file for `key`. Non-canonical keys are mapped onto their canonical form.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), FILE_EXTENSION))
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.root.join(BACKUP_DIR).join(canonical_key(key))
    }

    /// Backups for `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<BackupInfo>, CoreError> {
        ensure_canonical(key)?;
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_key(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION)
            {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(BackupInfo {
                    key: slug.clone(),
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    /// Decodes a backup without touching the live file.
    pub fn read_backup(&self, backup: &BackupInfo) -> Result<BudgetCollection, CoreError> {
        match fs::read(&backup.path) {
            Ok(blob) => decode_collection(&blob),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the live file for the backup's key with the backup contents.
    ///
    /// The backup is decoded first so a corrupt copy never replaces a good file.
    pub fn restore_backup(&self, backup: &BackupInfo) -> Result<BudgetCollection, CoreError> {
        let collection = self.read_backup(backup)?;
        self.save(&backup.key, &encode_collection(&collection)?)?;
        debug!(key = %backup.key, backup = %backup.id, "restored backup");
        Ok(collection)
    }

    fn backup_existing_file(&self, key: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!("{}_{}.{}", canonical_key(key), timestamp, FILE_EXTENSION);
        fs::copy(path, dir.join(file_name))?;
        self.prune_backups(key)
    }

    fn prune_backups(&self, key: &str) -> Result<(), CoreError> {
        for stale in self.list_backups(key)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                warn!(backup = %stale.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn save(&self, key: &str, blob: &[u8]) -> Result<(), CoreError> {
        ensure_canonical(key)?;
        let path = self.path_for(key);
        self.backup_existing_file(key, &path)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, blob)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = blob.len(), "saved snapshot");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        ensure_canonical(key)?;
        match fs::read(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "store".into()
    } else {
        sanitized
    }
}

/// Distinct keys such as `a/b` and `a_b` would share one file, so only canonical keys pass.
fn ensure_canonical(key: &str) -> Result<(), CoreError> {
    if canonical_key(key) == key {
        Ok(())
    } else {
        Err(CoreError::Storage(format!(
            "key `{key}` is not a valid file name; use `{}`",
            canonical_key(key)
        )))
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", FILE_EXTENSION))?;
    let mut segments = trimmed.rsplit('_');
    let time = segments.next()?;
    let date = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}
