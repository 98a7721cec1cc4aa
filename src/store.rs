use crate::config::{AppPaths, now_utc};
use crate::domain::User;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Whole-document JSON store: all users live in one file, loaded entirely on
/// open and rewritten entirely on every save. A timestamped copy of the fresh
/// file is kept after each save. Callers must uphold single-process access;
/// there is no lock.
pub struct JsonStore {
    file_path: PathBuf,
    backup_dir: PathBuf,
}

impl JsonStore {
    pub fn open(paths: &AppPaths) -> Result<Self> {
        let backup_dir = paths.data_dir.join("backup");
        fs::create_dir_all(&paths.data_dir)
            .with_context(|| format!("Failed to create data dir {}", paths.data_dir.display()))?;
        fs::create_dir_all(&backup_dir)
            .with_context(|| format!("Failed to create backup dir {}", backup_dir.display()))?;

        Ok(Self {
            file_path: paths.data_dir.join("users.json"),
            backup_dir,
        })
    }

    /// Missing file means a fresh install; an unreadable document is reported
    /// and treated as empty rather than aborting the whole session.
    pub fn load(&self) -> Result<Vec<User>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;

        match serde_json::from_str(&raw) {
            Ok(users) => Ok(users),
            Err(err) => {
                eprintln!(
                    "Corrupted data file {} ({err}). Starting with an empty store.",
                    self.file_path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn save(&self, users: &[User]) -> Result<()> {
        let json = serde_json::to_string_pretty(users)?;
        fs::write(&self.file_path, json)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        self.create_backup()?;
        Ok(())
    }

    fn create_backup(&self) -> Result<()> {
        let stamp = now_utc().format("%Y%m%d_%H%M%S");
        let backup_file = self.backup_dir.join(format!("backup_{stamp}.json"));
        fs::copy(&self.file_path, &backup_file)
            .with_context(|| format!("Failed to create backup {}", backup_file.display()))?;
        Ok(())
    }
}

/// Flat export of every user's transactions. Returns the number of rows written.
pub fn export_csv(users: &[User], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writer.write_record(["username", "type", "amount", "category", "date", "note"])?;

    let mut rows = 0usize;
    for user in users {
        for t in &user.transactions {
            writer.write_record([
                user.username.as_str(),
                t.kind.label(),
                &t.amount.to_string(),
                &t.category,
                &t.date,
                &t.note,
            ])?;
            rows += 1;
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(rows)
}
