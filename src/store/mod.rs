//! FilterStore: the in-memory rule set bound to a filter file.

mod config;

pub use config::{default_autocommit, set_default_autocommit, StoreOptions};

use ahash::AHashSet;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::codec::{FieldReader, FieldWriter, Storage, FORMAT_VERSION, SIZE_FIELD_LEN};
use crate::{Action, Column, Error, ListedRule, Relation, Result, Rule};

/// Column widths of the text table: ID, Column, Relation, Value, Action.
const TABLE_WIDTHS: [usize; 5] = [6, 24, 16, 16, 16];

/// Rules decoded from a stream.
#[derive(Debug, Default)]
struct Loaded {
    rules: Vec<Rule>,
    version: Option<u8>,
}

/// FilterStore owns an ordered rule list and the stream it was loaded from.
///
/// Mutations stay in memory until [`commit`](Self::commit) rewrites the
/// whole stream. Dropping a store never writes; use [`close`](Self::close)
/// to honor the auto-commit option.
pub struct FilterStore<S: Storage> {
    /// Backing stream, exclusively owned
    storage: S,
    /// Rules in file order
    rules: Vec<Rule>,
    /// Store options
    options: StoreOptions,
    /// Version byte read from the stream, if one was parsed
    loaded_version: Option<u8>,
    /// Uncommitted changes exist
    dirty: bool,
    /// Path the store was opened from, for atomic commits
    path: Option<PathBuf>,
}

impl FilterStore<File> {
    /// Open a filter file with default options.
    ///
    /// A missing or unreadable file is replaced by a fresh empty one.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open a filter file with explicit options.
    pub fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref();

        let existing = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(mut file) => match load(&mut file) {
                Ok(loaded) => Some((file, loaded)),
                Err(e) => {
                    log::warn!("Could not read filter file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Filter file {:?} not found, starting empty", path);
                None
            }
            Err(e) => {
                log::warn!("Could not open filter file {:?}: {}", path, e);
                None
            }
        };

        let (mut file, loaded) = match existing {
            Some(found) => found,
            None => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?;
                (file, Loaded::default())
            }
        };
        file.seek(SeekFrom::Start(0))?;

        log::debug!("Loaded {} rules from {:?}", loaded.rules.len(), path);

        let mut store = Self::with_loaded(file, loaded, options);
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// Path the store was opened from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Commit through a temporary file renamed over the original path.
    ///
    /// Readers see either the old or the new file, never a partial write.
    /// Stores not opened from a path fall back to [`commit`](Self::commit).
    pub fn commit_atomic(&mut self) -> Result<()> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => return self.commit(),
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        let size = write_rules(temp.as_file_mut(), &self.rules, 0)?;
        temp.as_file().sync_all()?;

        let mut file = temp.persist(&path).map_err(|e| Error::Io(e.error))?;
        file.seek(SeekFrom::Start(0))?;
        self.storage = file;
        self.dirty = false;

        log::debug!(
            "Atomically committed {} rules ({} bytes) to {:?}",
            self.rules.len(),
            size,
            path
        );
        Ok(())
    }
}

impl<S: Storage> FilterStore<S> {
    /// Load a store from any stream with default options.
    pub fn from_storage(storage: S) -> Result<Self> {
        Self::from_storage_with(storage, StoreOptions::default())
    }

    /// Load a store from any stream.
    ///
    /// A stream that fails to parse is truncated to zero and the store
    /// starts empty. Only IO errors while resetting the stream surface.
    pub fn from_storage_with(mut storage: S, options: StoreOptions) -> Result<Self> {
        let loaded = match load(&mut storage) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("Could not read filter data: {}", e);
                storage.truncate(0)?;
                Loaded::default()
            }
        };
        storage.seek(SeekFrom::Start(0))?;

        Ok(Self::with_loaded(storage, loaded, options))
    }

    fn with_loaded(storage: S, loaded: Loaded, options: StoreOptions) -> Self {
        Self {
            storage,
            rules: loaded.rules,
            options,
            loaded_version: loaded.version,
            dirty: false,
            path: None,
        }
    }

    /// Append a rule given display names.
    ///
    /// Names are checked before anything changes. The value gets a NUL
    /// terminator appended. Returns the new rule id.
    pub fn append(
        &mut self,
        column: &str,
        relation: &str,
        value: &str,
        action: &str,
    ) -> Result<u32> {
        let column =
            Column::from_name(column).ok_or_else(|| Error::UnknownColumn(column.to_string()))?;
        let relation =
            Relation::parse(relation).ok_or_else(|| Error::UnknownRelation(relation.to_string()))?;
        let action = Action::parse(action).ok_or_else(|| Error::UnknownAction(action.to_string()))?;

        self.append_rule(column, relation, value, action)
    }

    /// Append a rule from typed parts. Unknown column codes are accepted.
    ///
    /// The rule is inserted first and uniqueness checked afterwards; a
    /// duplicate is rolled back through [`remove`](Self::remove).
    pub fn append_rule(
        &mut self,
        column: Column,
        relation: Relation,
        value: &str,
        action: Action,
    ) -> Result<u32> {
        let id = self.next_id();
        let was_dirty = self.dirty;

        self.rules
            .push(Rule::new(id, column, relation, action, format!("{}\0", value)));

        if self.has_duplicates() {
            self.remove(id);
            self.dirty = was_dirty;
            return Err(Error::DuplicateRule);
        }

        self.dirty = true;
        Ok(id)
    }

    /// Remove the rule with `id`. Absent ids are ignored.
    ///
    /// Returns whether a rule was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id != id);
        let removed = self.rules.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Remove every rule.
    pub fn clear(&mut self) {
        if !self.rules.is_empty() {
            self.dirty = true;
        }
        self.rules.clear();
    }

    /// Rules in file order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Find a rule by id.
    pub fn get(&self, id: u32) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the store holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules projected to display names, in order.
    pub fn list(&self) -> Vec<ListedRule> {
        self.rules.iter().map(Rule::to_listed).collect()
    }

    /// Render the rules as a fixed-width text table with a header row.
    pub fn format_as_table(&self) -> String {
        let mut out = table_row(["ID", "Column", "Relation", "Value", "Action"]);
        for rule in &self.list() {
            let id = rule.id.to_string();
            out.push_str(&table_row([
                id.as_str(),
                rule.column.as_str(),
                rule.relation.as_str(),
                rule.value.as_str(),
                rule.action.as_str(),
            ]));
        }
        out
    }

    /// Rewrite the stream from offset 0.
    pub fn commit(&mut self) -> Result<()> {
        self.commit_at(0)
    }

    /// Rewrite header and records starting at `offset`, then truncate the
    /// stream right after the last record.
    pub fn commit_at(&mut self, offset: u64) -> Result<()> {
        let size = write_rules(&mut self.storage, &self.rules, offset)?;
        self.dirty = false;

        log::debug!("Committed {} rules ({} bytes)", self.rules.len(), size);
        Ok(())
    }

    /// Bytes that [`commit`](Self::commit) would write.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        write_rules(&mut buffer, &self.rules, 0)?;
        Ok(buffer.into_inner())
    }

    /// Close the store, committing first if auto-commit is on and there
    /// are pending changes. The stream is released on every path.
    pub fn close(mut self) -> Result<()> {
        if self.options.autocommit && self.dirty {
            self.commit()?;
        }
        Ok(())
    }

    /// Whether mutations happened since load or the last commit.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Version byte read at load time; `None` for an empty or new file.
    pub fn loaded_version(&self) -> Option<u8> {
        self.loaded_version
    }

    /// Store options.
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Borrow the backing stream.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn next_id(&self) -> u32 {
        self.rules.iter().map(|rule| rule.id).max().unwrap_or(0) + 1
    }

    fn has_duplicates(&self) -> bool {
        let keys: AHashSet<_> = self.rules.iter().map(Rule::key).collect();
        keys.len() != self.rules.len()
    }
}

impl<S: Storage> fmt::Display for FilterStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_as_table())
    }
}

impl<S: Storage> fmt::Debug for FilterStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("rules", &self.rules)
            .field("options", &self.options)
            .field("loaded_version", &self.loaded_version)
            .field("dirty", &self.dirty)
            .field("path", &self.path)
            .finish()
    }
}

impl<S: Storage> Drop for FilterStore<S> {
    fn drop(&mut self) {
        if self.dirty {
            log::debug!("Dropping store with uncommitted changes ({} rules)", self.rules.len());
        }
    }
}

/// Decode a whole stream from offset 0.
fn load<S: Storage>(storage: &mut S) -> Result<Loaded> {
    let len = storage.seek(SeekFrom::End(0))?;
    if len == 0 {
        log::debug!("Empty filter data, starting with no rules");
        return Ok(Loaded::default());
    }
    storage.seek(SeekFrom::Start(0))?;

    let mut reader = FieldReader::new(storage);
    let header = reader.read_header()?;
    if header.version != FORMAT_VERSION {
        log::debug!("Filter data has version {}, reading as {}", header.version, FORMAT_VERSION);
    }

    // The count is untrusted; let truncation stop a bogus one.
    let mut rules = Vec::with_capacity((header.rule_count as usize).min(1024));
    for position in 0..header.rule_count {
        rules.push(reader.read_rule(position)?);
    }

    let consumed = reader.position()? - SIZE_FIELD_LEN;
    if consumed != u64::from(header.total_size) {
        log::warn!(
            "Size field says {} bytes but records span {} ({} bytes in stream)",
            header.total_size,
            consumed,
            len
        );
    }

    Ok(Loaded {
        rules,
        version: Some(header.version),
    })
}

/// Write header and records at `offset`, backpatch the size field and
/// truncate after the last record. Returns the size field value.
fn write_rules<S: Storage>(storage: &mut S, rules: &[Rule], offset: u64) -> Result<u32> {
    let count = u32::try_from(rules.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many rules"))?;

    storage.seek(SeekFrom::Start(offset + SIZE_FIELD_LEN))?;

    let mut writer = FieldWriter::new(&mut *storage);
    writer.write_u8(FORMAT_VERSION)?;
    writer.write_u32_le(count)?;
    for rule in rules {
        writer.write_rule(rule)?;
    }
    let end = writer.position()?;

    let size = u32::try_from(end - offset - SIZE_FIELD_LEN)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "rule data exceeds 4 GiB"))?;

    storage.seek(SeekFrom::Start(offset))?;
    FieldWriter::new(&mut *storage).write_u32_le(size)?;

    storage.seek(SeekFrom::Start(end))?;
    storage.truncate(end)?;
    storage.flush()?;

    Ok(size)
}

fn table_row(cells: [&str; 5]) -> String {
    let mut row = String::new();
    for (cell, width) in cells.iter().zip(TABLE_WIDTHS) {
        row.push_str(&format!("{:<width$}", cell, width = width));
    }
    row.push('\n');
    row
}
