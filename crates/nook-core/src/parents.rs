use crate::PageRecord;
use std::collections::HashMap;

/// Fills each record's `parent` with the name of the record whose `id` equals
/// its `parent_id`.
///
/// When ids repeat, the first record wins. Unresolved parents are left as empty
/// strings. Returns the number of records that got a parent name.
pub fn resolve_parents(records: &mut [PageRecord]) -> usize {
    let mut names: HashMap<String, String> = HashMap::with_capacity(records.len());
    for record in records.iter() {
        names
            .entry(record.id.clone())
            .or_insert_with(|| record.name.clone());
    }

    let mut resolved = 0;
    for record in records.iter_mut() {
        if record.parent_id.is_empty() {
            continue;
        }
        if let Some(name) = names.get(&record.parent_id) {
            record.parent.clone_from(name);
            resolved += 1;
        }
    }
    resolved
}

/// Drops records that fell back to the untitled placeholder.
///
/// Run after [`resolve_parents`] so children of untitled pages keep their
/// resolved parent name.
pub fn drop_untitled(records: &mut Vec<PageRecord>) -> usize {
    let before = records.len();
    records.retain(|record| !record.is_untitled());
    before - records.len()
}
