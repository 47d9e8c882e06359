// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;

use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

/// A durable string-to-string store. Entries survive across runs until they
/// are removed.
pub struct Database {
    conn: Connection,
}

/// Metadata about a stored entry, without its value.
#[derive(Clone, Debug)]
pub struct EntryInfo {
    pub key: String,
    pub updated_at: Timestamp,
}

impl Database {
    pub fn new(database_path: &Path) -> Fallible<Self> {
        let conn = Connection::open(database_path)?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(mut conn: Connection) -> Fallible<Self> {
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating store schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    pub fn get(&self, key: &str) -> Fallible<Option<String>> {
        let sql = "select value from entries where key = ?;";
        let value: Option<String> = self
            .conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite an entry.
    pub fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        log::debug!("Writing store entry {key}.");
        let tx = self.conn.transaction()?;
        let seq: i64 = tx.query_row("select coalesce(max(seq), 0) + 1 from entries;", [], |row| {
            row.get(0)
        })?;
        let sql = "insert into entries (key, value, seq, updated_at) values (?, ?, ?, ?) on conflict (key) do update set value = excluded.value, seq = excluded.seq, updated_at = excluded.updated_at;";
        tx.execute(sql, (key, value, seq, Timestamp::now()))?;
        tx.commit()?;
        Ok(())
    }

    /// Remove an entry. Returns whether it existed.
    pub fn remove(&mut self, key: &str) -> Fallible<bool> {
        let count = self.conn.execute("delete from entries where key = ?;", [key])?;
        Ok(count > 0)
    }

    /// All entries whose key starts with `prefix`, least recently written
    /// first.
    pub fn entries_with_prefix(&self, prefix: &str) -> Fallible<Vec<EntryInfo>> {
        let mut stmt = self
            .conn
            .prepare("select key, updated_at from entries order by seq;")?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            if key.starts_with(prefix) {
                let updated_at: Timestamp = row.get(1)?;
                entries.push(EntryInfo { key, updated_at });
            }
        }
        Ok(entries)
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["entries"], |row| row.get(0))?;
    Ok(count > 0)
}
