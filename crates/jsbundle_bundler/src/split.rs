//! Split assignment (discovery phase 2): deciding which bundle each
//! discovered file belongs to, and the per-bundle bookkeeping the rewrite
//! phase needs to emit lazy `import()` trampolines.
//!
//! A file reachable only from a main entry belongs to the main split;
//! otherwise it belongs to whichever split's entry first reaches it in
//! entry-declaration order — a breadth-first reachability sweep per
//! split, seeded by `PartToMainFilesMap`, mirroring the teacher's
//! `optimize`-stage fixed-point-over-a-worklist shape generalized from
//! "keep folding" to "keep claiming unclaimed files".

use std::collections::{HashMap, HashSet, VecDeque};

pub const MAIN_SPLIT: &str = "main";

/// One bundle's worth of bookkeeping: which files it owns, and which
/// other splits a main-split consumer must transitively lazy-load to
/// reach a file living here.
#[derive(Debug, Clone)]
pub struct SplitInfo {
    pub name: String,
    pub is_main: bool,
    /// The property name under which this split's loader registers each
    /// exported symbol it makes available to `__import`.
    pub prop_names: HashMap<String, String>,
    /// `resolvedFileName -> exported symbol's property name`, i.e. every
    /// identifier this split may be asked for via `__import(split, prop)`.
    pub exported_props: HashMap<String, String>,
    /// Splits a *main*-split consumer must load (transitively) before this
    /// split's own `__import` call resolves, in load order.
    pub forced_lazy: Vec<String>,
}

impl SplitInfo {
    fn new(name: String, is_main: bool) -> Self {
        SplitInfo {
            name,
            is_main,
            prop_names: HashMap::new(),
            exported_props: HashMap::new(),
            forced_lazy: Vec::new(),
        }
    }
}

/// Assigns every file reachable from `part_to_main_files` to a split and
/// returns each split's [`SplitInfo`], keyed by split name.
///
/// `requires_of(file)` and `lazy_requires_of(file)` give, respectively, the
/// eager and `import()` edges discovered for `file` in phase 1.
pub fn assign_splits(
    part_to_main_files: &HashMap<String, Vec<String>>,
    requires_of: impl Fn(&str) -> Vec<String>,
    lazy_requires_of: impl Fn(&str) -> Vec<String>,
) -> (HashMap<String, String>, HashMap<String, SplitInfo>) {
    let mut owner: HashMap<String, String> = HashMap::new();
    let mut splits: HashMap<String, SplitInfo> = HashMap::new();

    // Deterministic, main-first processing order. Sorted so two runs over
    // the same `part_to_main_files` always agree, independent of HashMap's
    // iteration order.
    let mut split_order: Vec<String> = part_to_main_files.keys().cloned().collect();
    split_order.sort();
    split_order.retain(|name| name != MAIN_SPLIT);
    if part_to_main_files.contains_key(MAIN_SPLIT) {
        split_order.insert(0, MAIN_SPLIT.to_string());
    }

    // Every split's own declared entries claim themselves before any
    // transitive reachability runs, so a file another split's entry
    // explicitly names can never be swallowed by an earlier split's lazy
    // "land somewhere" fallback below.
    for split_name in &split_order {
        if let Some(entries) = part_to_main_files.get(split_name) {
            for entry in entries {
                owner.entry(entry.clone()).or_insert_with(|| split_name.clone());
            }
        }
    }

    for split_name in &split_order {
        let is_main = split_name == MAIN_SPLIT;
        if let Some(entries) = part_to_main_files.get(split_name) {
            claim_reachable(split_name, entries, &requires_of, &lazy_requires_of, &mut owner);
        }
        splits
            .entry(split_name.clone())
            .or_insert_with(|| SplitInfo::new(split_name.clone(), is_main));
    }
    splits.entry(MAIN_SPLIT.to_string()).or_insert_with(|| SplitInfo::new(MAIN_SPLIT.to_string(), true));

    // Every lazy `import()` target needs a property name its owning
    // split's loader can be asked for via `__import(split, prop)`. The
    // resolved file name is already unique across the whole graph, so it
    // doubles as its own prop.
    let all_files: Vec<String> = owner.keys().cloned().collect();
    for file in &all_files {
        for lazy in lazy_requires_of(file) {
            if let Some(owning_split) = owner.get(&lazy).cloned() {
                if let Some(info) = splits.get_mut(&owning_split) {
                    info.exported_props.insert(lazy.clone(), lazy.clone());
                    info.prop_names.insert(lazy.clone(), lazy.clone());
                }
            }
        }
    }

    // `ExpandedSplitsForcedLazy`: for every split, the transitive closure
    // of *other* splits a main-split consumer must pre-load to observe an
    // `import()` aimed at a file this split owns, found by walking the
    // lazy edges of every file this split owns and mapping their owners.
    let split_names: Vec<String> = splits.keys().cloned().collect();
    for split_name in split_names {
        let mut forced = Vec::new();
        let mut seen = HashSet::new();
        let files_in_split: Vec<String> =
            owner.iter().filter(|(_, s)| **s == split_name).map(|(f, _)| f.clone()).collect();
        let mut queue: VecDeque<String> = files_in_split.into_iter().collect();
        while let Some(file) = queue.pop_front() {
            for lazy in lazy_requires_of(&file) {
                if let Some(other_split) = owner.get(&lazy) {
                    if other_split != &split_name && seen.insert(other_split.clone()) {
                        forced.push(other_split.clone());
                    }
                }
            }
        }
        if let Some(info) = splits.get_mut(&split_name) {
            info.forced_lazy = forced;
        }
    }

    (owner, splits)
}

fn claim_reachable(
    split_name: &str,
    entries: &[String],
    requires_of: &impl Fn(&str) -> Vec<String>,
    lazy_requires_of: &impl Fn(&str) -> Vec<String>,
    owner: &mut HashMap<String, String>,
) {
    // `visited` tracks which files this particular sweep has already
    // expanded, separately from `owner`: an entry may already be owned by
    // this same split (claimed up front so other splits can't steal it)
    // without having had its own `requires`/`lazy_requires` walked yet.
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = entries.iter().cloned().collect();
    while let Some(file) = queue.pop_front() {
        if !visited.insert(file.clone()) {
            continue;
        }
        match owner.get(&file) {
            Some(owned_by) if owned_by != split_name => continue,
            _ => {
                owner.insert(file.clone(), split_name.to_string());
            }
        }
        for req in requires_of(&file) {
            queue.push_back(req);
        }
        // Lazy edges do not pull their target into this split eagerly —
        // the target gets its own split via its own entry unless a
        // caller placed it in `part_to_main_files` directly — but a lazy
        // edge to a file *not yet claimed by anyone* must still land
        // somewhere; treat an otherwise-unclaimed lazy target as owned by
        // the split that first requested it.
        for lazy in lazy_requires_of(&file) {
            if !owner.contains_key(&lazy) {
                queue.push_back(lazy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_entry_claims_its_require_chain() {
        let mut map = HashMap::new();
        map.insert(MAIN_SPLIT.to_string(), vec!["index.js".to_string()]);
        let requires = |f: &str| if f == "index.js" { vec!["a.js".to_string()] } else { vec![] };
        let lazy = |_: &str| vec![];
        let (owner, _splits) = assign_splits(&map, requires, lazy);
        assert_eq!(owner.get("a.js").map(String::as_str), Some(MAIN_SPLIT));
    }

    #[test]
    fn lazy_split_is_forced_on_consuming_split() {
        let mut map = HashMap::new();
        map.insert(MAIN_SPLIT.to_string(), vec!["index.js".to_string()]);
        map.insert("chunkX".to_string(), vec!["x.js".to_string()]);
        map.insert("chunkY".to_string(), vec!["y.js".to_string()]);
        let requires = |_: &str| vec![];
        let lazy = |f: &str| if f == "x.js" { vec!["y.js".to_string()] } else { vec![] };
        let (owner, splits) = assign_splits(&map, requires, lazy);
        assert_eq!(owner.get("y.js").map(String::as_str), Some("chunkY"));
        assert_eq!(splits["chunkX"].forced_lazy, vec!["chunkY".to_string()]);
    }
}
