//! Dashboard file list.
//!
//! The list is client-side only: uploads synthesize a record from the picked
//! file's metadata, nothing is transferred, and everything is lost on reload.

#[cfg(test)]
#[path = "files_test.rs"]
mod files_test;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileItem {
    pub id: String,
    pub name: String,
    /// Human-readable size, e.g. `2.38 MB`.
    pub size: String,
    /// ISO calendar day, e.g. `2023-06-15`.
    pub date: String,
    /// Short type label shown as a badge, e.g. `PDF`.
    pub kind: String,
}

/// Metadata read from the file input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: u64,
    pub mime: String,
}

/// Ordered newest-first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileList {
    items: Vec<FileItem>,
}

impl FileList {
    /// The three entries the dashboard starts with.
    pub fn with_samples() -> Self {
        let sample = |id: &str, name: &str, size: &str, date: &str, kind: &str| FileItem {
            id: id.to_owned(),
            name: name.to_owned(),
            size: size.to_owned(),
            date: date.to_owned(),
            kind: kind.to_owned(),
        };
        Self {
            items: vec![
                sample("1", "project-plan.pdf", "2.4 MB", "2023-06-15", "PDF"),
                sample("2", "vacation-photos.zip", "15.7 MB", "2023-06-10", "ZIP"),
                sample("3", "financial-report.xlsx", "1.2 MB", "2023-06-05", "Excel"),
            ],
        }
    }

    pub fn items(&self) -> &[FileItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FileItem> {
        self.items.iter().find(|f| f.id == id)
    }

    /// Record `file` as uploaded on `date` and put it at the top.
    pub fn upload(&mut self, file: &SelectedFile, date: &str) -> &FileItem {
        let item = FileItem {
            id: uuid::Uuid::new_v4().to_string(),
            name: file.name.clone(),
            size: format_file_size(file.bytes),
            date: date.to_owned(),
            kind: file_type_label(&file.mime),
        };
        self.items.insert(0, item);
        &self.items[0]
    }

    pub fn remove(&mut self, id: &str) -> Option<FileItem> {
        let index = self.items.iter().position(|f| f.id == id)?;
        Some(self.items.remove(index))
    }
}

/// `0 Bytes`, `512 Bytes`, `1.5 KB`, `2.38 MB`, ... capped at GB, at most two
/// decimals with trailing zeros dropped.
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_owned();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

/// MIME subtype upper-cased (`application/pdf` -> `PDF`), or `FILE` when the
/// browser reported no usable type.
pub fn file_type_label(mime: &str) -> String {
    match mime.split('/').nth(1).map(str::trim) {
        Some(subtype) if !subtype.is_empty() => subtype.to_uppercase(),
        _ => "FILE".to_owned(),
    }
}

/// Calendar day of an ISO-8601 timestamp (`2024-03-01T12:00:00Z` -> `2024-03-01`).
pub fn iso_day(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}
