//! go.mod manifest parsing.
//!
//! Only `require (...)` and `replace (...)` blocks carry dependency
//! information for the exposure check. The parser is a small line state
//! machine; anything inside a block that does not match the expected shape
//! is skipped, never an error.

use crate::model::PackageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    Outside,
    InRequireBlock,
    InReplaceBlock,
}

/// Parses manifest text into the final, override-applied record set.
///
/// Records keep first-seen order. A `replace` directive for a module path
/// already in the set overwrites its version in place; an unknown path is
/// appended. The set never holds two records for the same path because of
/// an override.
pub fn parse_manifest(text: &str) -> Vec<PackageRecord> {
    let mut records: Vec<PackageRecord> = Vec::new();
    let mut state = BlockState::Outside;

    for line in text.lines() {
        state = match state {
            BlockState::Outside => {
                if line.starts_with("require (") {
                    BlockState::InRequireBlock
                } else if line.starts_with("replace (") {
                    BlockState::InReplaceBlock
                } else {
                    BlockState::Outside
                }
            }
            BlockState::InRequireBlock => {
                if line.starts_with(')') {
                    BlockState::Outside
                } else {
                    consume_require_line(line, &mut records);
                    BlockState::InRequireBlock
                }
            }
            BlockState::InReplaceBlock => {
                if line.starts_with(')') {
                    BlockState::Outside
                } else {
                    consume_replace_line(line, &mut records);
                    BlockState::InReplaceBlock
                }
            }
        };
    }

    records
}

fn consume_require_line(line: &str, records: &mut Vec<PackageRecord>) {
    if !line.starts_with('\t') && !line.starts_with(' ') {
        return;
    }

    let mut fields = line.split_whitespace();
    let (Some(name), Some(version)) = (fields.next(), fields.next()) else {
        return;
    };

    tracing::debug!(name, version, "require statement");
    records.push(PackageRecord::new(name, version));
}

fn consume_replace_line(line: &str, records: &mut Vec<PackageRecord>) {
    // Not a replace statement without the marker.
    let Some((left, right)) = line.split_once("=>") else {
        return;
    };

    // The overridden name sits behind exactly one tab or space of
    // indentation; a line without that prefix is discarded before any
    // replace/append happens.
    let Some(stripped) = left
        .strip_prefix('\t')
        .or_else(|| left.strip_prefix(' '))
    else {
        return;
    };
    let name = stripped.trim();
    if name.is_empty() {
        return;
    }

    // Right side is "<replacement-path> <version>"; a filesystem replacement
    // has no version field and is skipped.
    let mut fields = right.split_whitespace();
    let (Some(_replacement), Some(version)) = (fields.next(), fields.next()) else {
        return;
    };

    tracing::debug!(name, version, "replace statement");

    if let Some(existing) = records.iter_mut().find(|record| record.name == name) {
        existing.version = version.to_string();
    } else {
        records.push(PackageRecord::new(name, version));
    }
}
