use redb::TableDefinition;

/// Entry records: uuid -> Entry (msgpack)
pub const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

/// Ordering index: (created_at micros, uuid) -> (), iterated in reverse for newest-first listing
pub const ENTRY_TIMELINE: TableDefinition<(i64, &str), ()> = TableDefinition::new("entry_timeline");

/// Word index: stored word -> msgpack Vec of entry UUIDs in insertion order
pub const WORD_ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("word_entries");
