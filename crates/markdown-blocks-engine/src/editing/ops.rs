//! Pure transitions over a block sequence.
//!
//! Each function takes the previous sequence and returns the next one; none of
//! them mutate their input. Unknown ids leave the sequence unchanged.

use crate::models::{Attributes, Block, BlockType};
use crate::parsing::shortcuts::{self, Mode};

/// Where a dragged block lands relative to the block it was dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

fn index_of(blocks: &[Block], id: &str) -> Option<usize> {
    blocks.iter().position(|b| b.id == id)
}

/// Map the block with `id` through `f`.
pub fn map_block(blocks: &[Block], id: &str, f: impl FnOnce(&Block) -> Block) -> Vec<Block> {
    let mut next = blocks.to_vec();
    if let Some(ix) = index_of(blocks, id) {
        next[ix] = f(&blocks[ix]);
    }
    next
}

/// Replace the block sharing `block.id`.
pub fn replace_block(blocks: &[Block], block: Block) -> Vec<Block> {
    let id = block.id.clone();
    map_block(blocks, &id, |_| block)
}

/// Set a block's text, running the while-typing shortcut rules over it.
pub fn update_content(blocks: &[Block], id: &str, text: &str) -> Vec<Block> {
    map_block(blocks, id, |block| {
        let mut edited = block.clone();
        edited.content = text.to_string();
        shortcuts::normalize_block(&edited, Mode::WhileTyping)
    })
}

/// Shallow-merge `partial` into a block's attributes.
pub fn update_attributes(blocks: &[Block], id: &str, partial: &Attributes) -> Vec<Block> {
    map_block(blocks, id, |block| {
        let mut next = block.clone();
        for (key, value) in partial {
            next.attributes.insert(key.clone(), value.clone());
        }
        next
    })
}

/// Splice `block` in right after `after`, or append when `after` is `None`
/// or not present.
pub fn insert_block_after(blocks: &[Block], after: Option<&str>, block: Block) -> Vec<Block> {
    let mut next = blocks.to_vec();
    let at = after
        .and_then(|id| index_of(blocks, id))
        .map_or(next.len(), |ix| ix + 1);
    next.insert(at, block);
    next
}

/// Clone a block under `new_id`, placing the copy right after the source.
pub fn duplicate_block(blocks: &[Block], id: &str, new_id: String) -> Vec<Block> {
    let Some(ix) = index_of(blocks, id) else {
        return blocks.to_vec();
    };
    let mut copy = blocks[ix].clone();
    copy.id = new_id;
    let mut next = blocks.to_vec();
    next.insert(ix + 1, copy);
    next
}

/// Whether removing a block is allowed: the last remaining block never is.
pub fn can_remove(blocks: &[Block]) -> bool {
    blocks.len() > 1
}

/// Remove a block. Removing the only block is refused.
pub fn remove_block(blocks: &[Block], id: &str) -> Vec<Block> {
    if !can_remove(blocks) {
        log::warn!("refusing to remove {id}: it is the last block");
        return blocks.to_vec();
    }
    blocks.iter().filter(|b| b.id != id).cloned().collect()
}

/// Retype a block, replacing its attributes with `defaults`. Content is kept
/// verbatim.
pub fn convert_block_type(
    blocks: &[Block],
    id: &str,
    kind: BlockType,
    defaults: Attributes,
) -> Vec<Block> {
    map_block(blocks, id, |block| {
        let mut next = block.clone();
        next.kind = kind;
        next.attributes = defaults;
        next
    })
}

/// Move `source` next to `target`.
///
/// The insertion point is the target's index once the source has been taken
/// out, plus one when dropping after it.
pub fn move_block(blocks: &[Block], source: &str, target: &str, position: DropPosition) -> Vec<Block> {
    if source == target {
        return blocks.to_vec();
    }
    let (Some(from), Some(to)) = (index_of(blocks, source), index_of(blocks, target)) else {
        return blocks.to_vec();
    };

    let mut next = blocks.to_vec();
    let moved = next.remove(from);

    let mut at = if to > from { to - 1 } else { to };
    if position == DropPosition::After {
        at += 1;
    }
    let at = at.min(next.len());
    next.insert(at, moved);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn doc(ids: &[&str]) -> Vec<Block> {
        ids.iter().map(|id| Block::paragraph(*id, *id)).collect()
    }

    fn ids(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.id.as_str()).collect()
    }

    #[rstest]
    #[case("A", DropPosition::After, "C", &["B", "C", "A", "D"])]
    #[case("A", DropPosition::Before, "C", &["B", "A", "C", "D"])]
    #[case("D", DropPosition::Before, "B", &["A", "D", "B", "C"])]
    #[case("D", DropPosition::After, "B", &["A", "B", "D", "C"])]
    #[case("A", DropPosition::After, "D", &["B", "C", "D", "A"])]
    #[case("D", DropPosition::Before, "A", &["D", "A", "B", "C"])]
    #[case("B", DropPosition::Before, "C", &["A", "B", "C", "D"])]
    #[case("C", DropPosition::After, "B", &["A", "B", "C", "D"])]
    fn move_resolves_index_shift(
        #[case] source: &str,
        #[case] position: DropPosition,
        #[case] target: &str,
        #[case] expected: &[&str],
    ) {
        let blocks = doc(&["A", "B", "C", "D"]);
        let moved = move_block(&blocks, source, target, position);
        assert_eq!(ids(&moved), expected);
    }

    #[test]
    fn move_with_unknown_or_same_ids_is_noop() {
        let blocks = doc(&["A", "B"]);
        assert_eq!(move_block(&blocks, "A", "A", DropPosition::After), blocks);
        assert_eq!(move_block(&blocks, "X", "A", DropPosition::After), blocks);
        assert_eq!(move_block(&blocks, "A", "X", DropPosition::Before), blocks);
    }

    #[test]
    fn insert_after_anchor_or_append() {
        let blocks = doc(&["A", "B"]);
        let new = Block::paragraph("N", "");
        assert_eq!(ids(&insert_block_after(&blocks, Some("A"), new.clone())), ["A", "N", "B"]);
        assert_eq!(ids(&insert_block_after(&blocks, None, new.clone())), ["A", "B", "N"]);
        assert_eq!(ids(&insert_block_after(&blocks, Some("zz"), new)), ["A", "B", "N"]);
    }

    #[test]
    fn duplicate_copies_next_to_source() {
        let blocks = vec![
            Block::list("A", ListKind::Todo { checked: true }, "milk"),
            Block::paragraph("B", "b"),
        ];
        let next = duplicate_block(&blocks, "A", "A2".into());
        assert_eq!(ids(&next), ["A", "A2", "B"]);
        assert_eq!(next[1].content, "milk");
        assert_eq!(next[1].attributes, next[0].attributes);
        assert_eq!(duplicate_block(&blocks, "nope", "x".into()), blocks);
    }

    #[test]
    fn remove_guards_last_block() {
        let single = doc(&["A"]);
        assert!(!can_remove(&single));
        assert_eq!(remove_block(&single, "A"), single);

        let pair = doc(&["A", "B"]);
        assert!(can_remove(&pair));
        assert_eq!(ids(&remove_block(&pair, "A")), ["B"]);
    }

    #[test]
    fn update_attributes_merges_shallowly() {
        let blocks = vec![Block::list("A", ListKind::Todo { checked: false }, "x")];
        let partial: Attributes = serde_json::from_value(json!({"checked": true})).unwrap();
        let next = update_attributes(&blocks, "A", &partial);
        assert_eq!(next[0].list_kind(), Some(ListKind::Todo { checked: true }));
        assert_eq!(next[0].content, "x");
        assert_eq!(next[0].kind, BlockType::List);
    }

    #[test]
    fn update_content_runs_heading_rule_only() {
        let blocks = doc(&["A"]);
        let next = update_content(&blocks, "A", "## Hi");
        assert_eq!(next[0].kind, BlockType::Heading);
        assert_eq!(next[0].heading_level(), Some(2));

        let next = update_content(&next, "A", "Hi");
        assert_eq!(next[0].kind, BlockType::Paragraph);
        assert!(next[0].attributes.is_empty());

        let next = update_content(&next, "A", "- not a list yet");
        assert_eq!(next[0].kind, BlockType::Paragraph);
        assert_eq!(next[0].content, "- not a list yet");
    }

    #[test]
    fn convert_keeps_content_and_resets_attributes() {
        let blocks = vec![Block::list("A", ListKind::Ordered { order: 5 }, "- x")];
        let next = convert_block_type(&blocks, "A", BlockType::Quote, Attributes::new());
        assert_eq!(next[0].kind, BlockType::Quote);
        assert_eq!(next[0].content, "- x");
        assert!(next[0].attributes.is_empty());
    }
}
