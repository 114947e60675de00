//! Expansion of independently varying phone fragments into full variants.
//!
//! Input chunks are separated by whitespace; each chunk holds one or more
//! `|`-separated alternatives. Every path through the chunk graph is one
//! combination, hyphen-joined, and the resulting variants are pipe-joined.

use std::collections::HashSet;

use super::{PHONE_SEPARATOR, VARIANT_SEPARATOR};

/// Composes every combination of the chunks' alternatives.
///
/// The first chunk varies slowest. Duplicate combinations are emitted once and
/// enumeration stops after `max_variants` combinations (`0` means no cap).
pub fn compose(chunks: &str, max_variants: usize) -> String {
    let graph: Vec<Vec<&str>> = chunks
        .split_whitespace()
        .map(|chunk| chunk.split(VARIANT_SEPARATOR).collect())
        .collect();
    if graph.is_empty() {
        return String::new();
    }

    let mut variants: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cursor = vec![0usize; graph.len()];
    loop {
        let variant = join_path(&graph, &cursor);
        if seen.insert(variant.clone()) {
            variants.push(variant);
            if max_variants != 0 && variants.len() >= max_variants {
                break;
            }
        }
        if !advance(&graph, &mut cursor) {
            break;
        }
    }

    variants.join(VARIANT_SEPARATOR.to_string().as_str())
}

fn join_path(graph: &[Vec<&str>], cursor: &[usize]) -> String {
    let mut variant = String::new();
    for (alternatives, &choice) in graph.iter().zip(cursor) {
        let phones = alternatives[choice].trim_matches(PHONE_SEPARATOR);
        if phones.is_empty() {
            continue;
        }
        if !variant.is_empty() {
            variant.push(PHONE_SEPARATOR);
        }
        variant.push_str(phones);
    }
    variant
}

/// Moves to the next path, last chunk fastest. Returns false once exhausted.
fn advance(graph: &[Vec<&str>], cursor: &mut [usize]) -> bool {
    for position in (0..graph.len()).rev() {
        cursor[position] += 1;
        if cursor[position] < graph[position].len() {
            return true;
        }
        cursor[position] = 0;
    }
    false
}
