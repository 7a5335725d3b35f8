use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::comparator::PageIndex;

use super::error::ExtractionError;

/// Image file extensions accepted as pages.
pub const PAGE_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Clone, PartialEq, Eq)]
/// One rasterized page of a document.
pub struct PageImage {
    pub index: PageIndex,
    /// File name (or other label) the page came from.
    pub name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PageImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageImage")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// One page slot of a document: the image, or why it could not be read.
///
/// A failed read still occupies its position so later pages keep their index.
pub type PageRead = Result<PageImage, ExtractionError>;

#[async_trait]
/// Yields the page images of one document, in physical page order.
///
/// The outer error means the document itself could not be enumerated.
pub trait PageSource: Send + Sync {
    async fn pages(&self) -> Result<Vec<PageRead>, ExtractionError>;
}

/// A directory of page images in natural file-name order (`page2` before `page10`).
///
/// Files whose extension is not in [`PAGE_IMAGE_EXTENSIONS`] are ignored.
#[derive(Debug, Clone)]
pub struct ImageDirectorySource {
    dir: PathBuf,
}

impl ImageDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl PageSource for ImageDirectorySource {
    async fn pages(&self) -> Result<Vec<PageRead>, ExtractionError> {
        let unavailable = |reason: String| ExtractionError::SourceUnavailable {
            path: self.dir.clone(),
            reason,
        };

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let mut files: Vec<(String, PathBuf, &'static str)> = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| unavailable(e.to_string()))?
        {
            let path = entry.path();
            let Some(media_type) = media_type_for(&path) else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push((name, path, media_type));
        }

        files.sort_by(|a, b| natural_cmp(&a.0, &b.0));

        let mut pages = Vec::with_capacity(files.len());
        for (offset, (name, path, media_type)) in files.into_iter().enumerate() {
            let index = PageIndex::from_offset(offset);
            match tokio::fs::read(&path).await {
                Ok(bytes) => pages.push(Ok(PageImage {
                    index,
                    name,
                    media_type,
                    bytes,
                })),
                Err(e) => {
                    warn!(page = index.get(), path = %path.display(), error = %e, "Page image unreadable");
                    pages.push(Err(ExtractionError::ReadFailed {
                        path,
                        reason: e.to_string(),
                    }));
                }
            }
        }

        debug!(dir = %self.dir.display(), pages = pages.len(), "Enumerated page images");
        Ok(pages)
    }
}

/// Page images held in memory, in the order they were pushed.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageSource {
    pages: Vec<PageImage>,
}

impl MemoryPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, media_type: &'static str, bytes: Vec<u8>) {
        self.pages.push(PageImage {
            index: PageIndex::from_offset(self.pages.len()),
            name: name.into(),
            media_type,
            bytes,
        });
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl PageSource for MemoryPageSource {
    async fn pages(&self) -> Result<Vec<PageRead>, ExtractionError> {
        Ok(self.pages.iter().cloned().map(Ok).collect())
    }
}

/// Resolves the media type of a page image from a declared content type,
/// falling back to the file name's extension.
pub fn page_media_type(name: &str, declared: Option<&str>) -> Option<&'static str> {
    match declared.map(|d| d.trim().to_ascii_lowercase()).as_deref() {
        Some("image/png") => Some("image/png"),
        Some("image/jpeg" | "image/jpg") => Some("image/jpeg"),
        _ => media_type_for(Path::new(name)),
    }
}

fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !PAGE_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(if ext == "png" { "image/png" } else { "image/jpeg" })
}

/// Compares file names with digit runs ordered by numeric value.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (da, ra) = split_digits(a);
                let (db, rb) = split_digits(b);
                let (ta, tb) = (da.trim_start_matches('0'), db.trim_start_matches('0'));
                let ord = ta
                    .len()
                    .cmp(&tb.len())
                    .then_with(|| ta.cmp(tb))
                    .then_with(|| da.len().cmp(&db.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
                (a, b) = (ra, rb);
            }
            (Some(x), Some(y)) => {
                let ord = x
                    .to_ascii_lowercase()
                    .cmp(&y.to_ascii_lowercase())
                    .then(x.cmp(&y));
                if ord != Ordering::Equal {
                    return ord;
                }
                (a, b) = (&a[x.len_utf8()..], &b[y.len_utf8()..]);
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}
