use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use super::{PhonetizationError, Result, PHONE_SEPARATOR, VARIANT_SEPARATOR};

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<String, usize>,
    terminal: bool,
}

/// Trie over the phones of every mapping key, so the longest mappable
/// prefix of a phone sequence is found in one walk.
#[derive(Debug, Clone)]
struct KeyTrie {
    nodes: Vec<TrieNode>,
}

impl KeyTrie {
    fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    fn insert(&mut self, key: &str) {
        let mut node_idx = 0;
        for phone in key.split(PHONE_SEPARATOR) {
            let next_idx = match self.nodes[node_idx].children.get(phone) {
                Some(&idx) => idx,
                None => {
                    let new_idx = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node_idx]
                        .children
                        .insert(phone.to_string(), new_idx);
                    new_idx
                }
            };
            node_idx = next_idx;
        }
        self.nodes[node_idx].terminal = true;
    }

    fn longest_prefix(&self, phones: &[&str]) -> Option<usize> {
        let mut node_idx = 0;
        let mut longest = None;
        for (depth, phone) in phones.iter().enumerate() {
            match self.nodes[node_idx].children.get(*phone) {
                Some(&next_idx) => node_idx = next_idx,
                None => break,
            }
            if self.nodes[node_idx].terminal {
                longest = Some(depth + 1);
            }
        }
        longest
    }
}

impl Default for KeyTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable phone substitution table.
///
/// Keys are single phones or hyphen-joined phone sequences. A key listed
/// several times keeps every substitute as a `|`-separated alternative.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<String, String>,
    trie: KeyTrie,
    keep_unmapped: bool,
}

impl MappingTable {
    /// An empty table; mapping through it is the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses two-column `from to` lines. `#` starts a comment line.
    pub fn from_text(data: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for (idx, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let columns: Vec<&str> = trimmed.split_whitespace().collect();
            match columns.as_slice() {
                [from, to] => pairs.push((idx + 1, *from, *to)),
                _ => {
                    return Err(PhonetizationError::mapping(
                        idx + 1,
                        format!("expected two columns, found {}: {trimmed}", columns.len()),
                    ))
                }
            }
        }
        let mut table = Self::new();
        for (line, from, to) in pairs {
            table.insert(line, from, to)?;
        }
        Ok(table)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = Self::new();
        for (idx, (from, to)) in pairs.into_iter().enumerate() {
            table.insert(idx + 1, from.as_ref(), to.as_ref())?;
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|err| {
            PhonetizationError::io(format!(
                "failed to read mapping table {}: {err}",
                path.display()
            ))
        })?;
        let table = Self::from_text(&data)?;
        info!(path = %path.display(), keys = table.len(), "mapping table loaded");
        Ok(table)
    }

    /// Sets whether phones without an entry pass through [`Self::map_entry`]
    /// unchanged (`true`) or are dropped (`false`, the default).
    pub fn with_keep_unmapped(mut self, keep_unmapped: bool) -> Self {
        self.keep_unmapped = keep_unmapped;
        self
    }

    pub fn keep_unmapped(&self) -> bool {
        self.keep_unmapped
    }

    fn insert(&mut self, line: usize, from: &str, to: &str) -> Result<()> {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() || to.is_empty() {
            return Err(PhonetizationError::mapping(line, "empty mapping column"));
        }
        if from.split(PHONE_SEPARATOR).any(str::is_empty) {
            return Err(PhonetizationError::mapping(
                line,
                format!("malformed phone sequence {from}"),
            ));
        }
        match self.entries.get_mut(from) {
            Some(existing) => {
                if !existing.split(VARIANT_SEPARATOR).any(|alt| alt == to) {
                    existing.push(VARIANT_SEPARATOR);
                    existing.push_str(to);
                }
            }
            None => {
                self.entries.insert(from.to_string(), to.to_string());
                self.trie.insert(from);
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Exact-match key test.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Exact-match substitute lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Substitute for `entry`, honouring the keep-unmapped policy.
    pub fn map_entry<'s>(&'s self, entry: &'s str) -> Option<&'s str> {
        match self.get(entry) {
            Some(mapped) => Some(mapped),
            None if self.keep_unmapped => Some(entry),
            None => None,
        }
    }

    /// Number of leading phones forming the longest key, if any.
    pub fn longest_match(&self, phones: &[&str]) -> Option<usize> {
        self.trie.longest_prefix(phones)
    }

    /// Maps every token of `text` delimited by any of `separators`, keeping
    /// the separators in place. Dropped phones leave an empty slot.
    pub fn map_phones(&self, text: &str, separators: &[char]) -> String {
        if self.is_empty() && self.keep_unmapped {
            return text.to_string();
        }
        let mut mapped = String::with_capacity(text.len());
        let mut start = 0;
        for (idx, ch) in text.char_indices() {
            if separators.contains(&ch) {
                self.push_mapped(&mut mapped, &text[start..idx]);
                mapped.push(ch);
                start = idx + ch.len_utf8();
            }
        }
        self.push_mapped(&mut mapped, &text[start..]);
        mapped
    }

    fn push_mapped(&self, out: &mut String, token: &str) {
        if token.is_empty() {
            return;
        }
        if let Some(value) = self.map_entry(token) {
            out.push_str(value);
        }
    }
}
