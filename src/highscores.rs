//! High score table stored as CSV
//!
//! One `name,score,level,lines` row per finished game, under a header row.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::Path;

const HEADER: &str = "name,score,level,lines";
/// Entries shown on the high score screen
pub const TOP_N: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
}

impl ScoreEntry {
    fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [name, score, level, lines] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            name: (*name).to_string(),
            score: score.parse().ok()?,
            level: level.parse().ok()?,
            lines: lines.parse().ok()?,
        })
    }

    fn to_row(&self) -> String {
        let name: String = self
            .name
            .chars()
            .filter(|c| !matches!(c, ',' | '\n' | '\r'))
            .collect();
        let mut row = String::new();
        let _ = write!(row, "{},{},{},{}", name.trim(), self.score, self.level, self.lines);
        row
    }
}

/// All recorded scores, best first
#[derive(Debug, Clone, Default)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Read the table at `path`. A missing file means no scores yet;
    /// malformed rows are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let mut entries = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            if line.trim().is_empty() || (i == 0 && line.trim() == HEADER) {
                continue;
            }
            match ScoreEntry::parse(line) {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(line = i + 1, "skipping malformed high score row"),
            }
        }
        entries.sort_by(|a, b| b.score.cmp(&a.score));

        Ok(Self { entries })
    }

    /// Append `entry` to the table at `path`, writing the header for a new file
    pub fn append(path: &Path, entry: &ScoreEntry) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create data dir {}", dir.display()))?;
        }

        let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut out = String::new();
        if needs_header {
            out.push_str(HEADER);
            out.push('\n');
        }
        out.push_str(&entry.to_row());
        out.push('\n');

        file.write_all(out.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(name = %entry.name, score = entry.score, "high score saved");
        Ok(())
    }

    /// Best `n` entries
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    #[allow(dead_code)]
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
