//! In-memory archive model.
//!
//! An [`ArchiveModel`] maps `/`-separated entry names, relative to the
//! archive root, to [`Entry`] values. Directory names carry a trailing `/`,
//! following the zip convention (`world/`, `world/inner/`).
//!
//! Every ancestor of an entry is an explicit directory entry. Insertion
//! through [`ArchiveModel::insert_file`] and [`ArchiveModel::insert_dir`]
//! creates missing ancestors on the spot; models assembled entry-by-entry by
//! a codec are fixed up once with [`ArchiveModel::normalize_directories`].

use std::collections::BTreeMap;

/// What an archive entry holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory entry. Carries no payload.
    Directory,
    /// Regular file with its full contents.
    File(Vec<u8>),
}

/// A single named entry of an [`ArchiveModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    kind: EntryKind,
}

impl Entry {
    /// Creates a directory entry. A trailing `/` is appended if missing.
    #[must_use]
    pub fn directory(name: &str) -> Self {
        Self {
            name: dir_name(name),
            kind: EntryKind::Directory,
        }
    }

    /// Creates a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File(data.into()),
        }
    }

    /// Entry name relative to the archive root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry kind.
    #[must_use]
    pub const fn kind(&self) -> &EntryKind {
        &self.kind
    }

    /// Returns `true` for directory entries.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// File payload, `None` for directories.
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        match &self.kind {
            EntryKind::File(data) => Some(data),
            EntryKind::Directory => None,
        }
    }

    /// Number of `/`-separated segments in the name (`a/` is 1, `a/b` is 2).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.name.trim_end_matches('/').split('/').count()
    }
}

/// In-memory tree of archive entries.
///
/// # Examples
///
/// ```
/// use ziplocal_core::ArchiveModel;
///
/// let mut model = ArchiveModel::new();
/// model.insert_file("world/says-world", "World");
///
/// // The intermediate directory was created automatically.
/// assert!(model.get("world/").is_some_and(|e| e.is_dir()));
/// assert_eq!(model.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveModel {
    entries: BTreeMap<String, Entry>,
}

impl ArchiveModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, directories included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the model has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by its exact name (`dir/` for directories).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// All entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// File entries in name order.
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().filter(|e| !e.is_dir())
    }

    /// Directory entries in name order.
    pub fn directories(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().filter(|e| e.is_dir())
    }

    /// Inserts (or replaces) a file, creating any missing ancestor
    /// directories.
    pub fn insert_file(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let entry = Entry::file(name, data);
        self.create_ancestors(entry.name());
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Inserts a directory and any missing ancestors. Existing directories
    /// are left untouched.
    pub fn insert_dir(&mut self, name: &str) {
        let entry = Entry::directory(name);
        self.create_ancestors(entry.name());
        self.entries.entry(entry.name.clone()).or_insert(entry);
    }

    /// Inserts an entry exactly as given, without creating ancestors.
    ///
    /// Used by codecs that load entries one at a time and normalize
    /// afterwards.
    pub(crate) fn insert_raw(&mut self, entry: Entry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Turns every implicit directory (a name prefix with no entry of its
    /// own) into an explicit directory entry.
    ///
    /// Returns the number of directory entries created.
    pub fn normalize_directories(&mut self) -> usize {
        let missing: Vec<String> = self
            .entries
            .keys()
            .flat_map(|name| ancestors(name))
            .filter(|dir| !self.entries.contains_key(*dir))
            .map(str::to_owned)
            .collect();

        let mut created = 0;
        for dir in missing {
            if !self.entries.contains_key(&dir) {
                self.entries.insert(dir.clone(), Entry::directory(&dir));
                created += 1;
            }
        }
        created
    }

    fn create_ancestors(&mut self, name: &str) {
        for dir in ancestors(name) {
            if !self.entries.contains_key(dir) {
                self.entries
                    .insert(dir.to_owned(), Entry::directory(dir));
            }
        }
    }
}

/// Yields the directory prefixes of `name`, outermost first, each ending in
/// `/`. `a/b/c.txt` yields `a/` then `a/b/`.
fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    let trimmed = name.trim_end_matches('/');
    trimmed
        .match_indices('/')
        .filter(|(idx, _)| *idx > 0)
        .map(move |(idx, _)| &trimmed[..=idx])
}

fn dir_name(name: &str) -> String {
    if name.ends_with('/') {
        name.to_owned()
    } else {
        format!("{name}/")
    }
}
