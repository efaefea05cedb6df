use std::path::PathBuf;

use tracing::{debug, info};

use crate::{
    common::error::{Result, StoreError},
    config::StoreConfig,
    db::table::{FieldSelection, Header, Row, Table},
    query::{
        condition::Condition,
        predicate::{is_full_match, validate_conditions},
    },
    storage::{
        codec::{self, RowLimit},
        line_store::{FileLineStore, LineStore, WriteMode},
    },
};

/// The main database handle.
///
/// A `Database` is a directory of table files. Every operation re-reads
/// and re-decodes the table it touches, computes its result, and (for
/// mutations) rewrites the whole file. Nothing is cached between calls.
///
/// # Concurrency
///
/// There is no locking. Callers must serialize access per table path: if
/// two writers mutate the same table, the last writer wins.
///
/// # Failure
///
/// `update` and `remove` rewrite through [`WriteMode::Truncate`]. With the
/// default [`FileLineStore`] the new contents go to a temp file first, so a
/// failed write leaves the previous table intact. Other stores may not give
/// that guarantee.
#[derive(Debug)]
pub struct Database<S = FileLineStore> {
    config: StoreConfig,
    store: S,
}

impl Database<FileLineStore> {
    /// Opens the database rooted at `config.data_dir` on the local filesystem.
    ///
    /// The directory must exist unless `config.create_dir` is set.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if !config.data_dir.is_dir() {
            if !config.create_dir {
                return Err(StoreError::NotFound(format!(
                    "{} is not an existing directory",
                    config.data_dir.display()
                )));
            }
            std::fs::create_dir_all(&config.data_dir)?;
            info!(dir = %config.data_dir.display(), "created data directory");
        }

        let store = FileLineStore::new(config.sync_writes);
        Ok(Self { config, store })
    }
}

impl<S: LineStore> Database<S> {
    /// Creates a database over a custom [`LineStore`].
    pub fn with_store(config: StoreConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Resolves a table name to its file, refusing names that would leave
    /// the data directory.
    fn path(&self, table: &str) -> Result<PathBuf> {
        let escapes = table.is_empty()
            || table == "."
            || table == ".."
            || table.contains(['/', '\\', '\0']);
        if escapes {
            return Err(StoreError::Format(format!("invalid table name {table:?}")));
        }
        Ok(self.config.table_path(table))
    }

    /// Checks whether a table file exists.
    pub fn exists(&self, table: &str) -> bool {
        self.path(table).is_ok_and(|path| self.store.exists(&path))
    }

    /// Creates a table file holding only the header line.
    pub fn create(&self, table: &str, fields: &[&str]) -> Result<()> {
        let path = self.path(table)?;
        if self.store.exists(&path) {
            return Err(StoreError::AlreadyExists(table.to_owned()));
        }

        let header = Header::new(fields.iter().copied())?;
        if header.is_empty() {
            return Err(StoreError::Format(format!(
                "table {table} needs at least one field"
            )));
        }

        self.store
            .write_text(&path, &header.to_line(), WriteMode::CreateNew)?;

        info!(table, fields = header.len(), "created table");
        Ok(())
    }

    /// Deletes a table file.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        let path = self.path(table)?;
        if !self.store.exists(&path) {
            return Err(StoreError::NotFound(table.to_owned()));
        }

        self.store.delete(&path)?;

        info!(table, "dropped table");
        Ok(())
    }

    /// Reads a table's raw, trimmed, non-blank lines, header included.
    pub fn read_lines(&self, table: &str, max_lines: Option<usize>) -> Result<Vec<String>> {
        let mut lines = self.store.read_lines(&self.path(table)?)?;
        if let Some(max) = max_lines {
            lines.truncate(max);
        }
        Ok(lines)
    }

    fn load(&self, table: &str, limit: RowLimit) -> Result<Table> {
        let lines = self.store.read_lines(&self.path(table)?)?;
        codec::decode(lines, limit)
    }

    /// Reads and decodes a whole table.
    pub fn read_table(&self, table: &str) -> Result<Table> {
        self.load(table, RowLimit::All)
    }

    /// Returns the rows matching every condition, projected onto `selection`.
    ///
    /// With [`FieldSelection::All`] rows are returned whole; otherwise each row
    /// holds the selected fields in selection order.
    pub fn select(
        &self,
        table: &str,
        selection: impl Into<FieldSelection>,
        conditions: &[Condition],
    ) -> Result<Vec<Row>> {
        let selection = selection.into();
        let Table { header, rows } = self.load(table, RowLimit::All)?;

        selection.validate(&header)?;
        validate_conditions(&header, conditions)?;

        let result: Vec<Row> = rows
            .iter()
            .filter(|row| is_full_match(row, conditions))
            .map(|row| selection.project(row))
            .collect();

        debug!(table, scanned = rows.len(), matched = result.len(), "select");
        Ok(result)
    }

    /// Sets `field` to `new_value` on every row matching all conditions and
    /// rewrites the table. Returns the number of rows changed.
    pub fn update(
        &self,
        table: &str,
        field: &str,
        new_value: &str,
        conditions: &[Condition],
    ) -> Result<usize> {
        let Table { header, mut rows } = self.load(table, RowLimit::All)?;

        header.require(field)?;
        validate_conditions(&header, conditions)?;
        codec::check_value(new_value)?;

        let mut updated = 0;
        for row in rows.iter_mut().filter(|row| is_full_match(row, conditions)) {
            row.set(field, new_value);
            codec::encode_row_checked(&header, row)?;
            updated += 1;
        }

        let text = codec::encode_parts(&header, &rows);
        self.store
            .write_text(&self.path(table)?, &text, WriteMode::Truncate)?;

        debug!(table, field, updated, "update");
        Ok(updated)
    }

    /// Appends one row.
    ///
    /// Only the header is decoded. `values` pair positionally with `fields`
    /// (or with every header field for the wildcard); the line is written in
    /// header order with omitted fields left empty.
    pub fn append(
        &self,
        table: &str,
        fields: impl Into<FieldSelection>,
        values: &[&str],
    ) -> Result<()> {
        let selection = fields.into();
        let Table { header, .. } = self.load(table, RowLimit::HeaderOnly)?;

        if header.is_empty() {
            return Err(StoreError::Format(format!("table {table} has no fields")));
        }
        selection.validate(&header)?;

        let expected = selection.width(&header);
        if values.len() != expected {
            return Err(StoreError::Arity {
                expected,
                actual: values.len(),
            });
        }
        values.iter().try_for_each(|value| codec::check_value(value))?;

        let row = Row::from_pairs(
            selection
                .resolve(&header)
                .iter()
                .map(String::as_str)
                .zip(values.iter().copied()),
        );
        let line = codec::encode_row_checked(&header, &row)?;

        self.store
            .write_text(&self.path(table)?, &line, WriteMode::Append)?;

        debug!(table, "append");
        Ok(())
    }

    /// Deletes every row matching all conditions and rewrites the table.
    /// Returns the number of rows removed.
    ///
    /// An empty condition list removes every row, keeping the header.
    pub fn remove(&self, table: &str, conditions: &[Condition]) -> Result<usize> {
        let Table { header, rows } = self.load(table, RowLimit::All)?;
        validate_conditions(&header, conditions)?;

        let total = rows.len();
        let survivors: Vec<Row> = rows
            .into_iter()
            .filter(|row| !is_full_match(row, conditions))
            .collect();
        let removed = total - survivors.len();

        let text = codec::encode_parts(&header, &survivors);
        self.store
            .write_text(&self.path(table)?, &text, WriteMode::Truncate)?;

        debug!(table, removed, remaining = survivors.len(), "remove");
        Ok(removed)
    }
}
