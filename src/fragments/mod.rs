//! Content fragmentation engine.
//!
//! Takes the ordered block sequence produced by the extractor and reassembles
//! it into retrievable fragments, each anchored to a numbered-paragraph label
//! (`1.2.15` style). Three pre-passes and a state machine:
//!
//! ```text
//! ContentBlock sequence
//!     │
//!     ├─► pseudo_list::group_pseudo_lists     merge unmarked list runs
//!     ├─► footer::truncate_footer             drop trailing chrome
//!     └─► assembler::assemble_fragments       headings attach forward,
//!                                             tables/lists/indented text
//!                                             attach backward
//! ```
//!
//! Everything here is pure and synchronous. Each chapter's blocks are
//! processed independently, so callers may fan out across chapters freely.

pub mod assembler;
pub mod blocks;
pub mod footer;
pub mod indent;
pub mod pseudo_list;

pub use assembler::{Fragment, assemble_fragments};
pub use blocks::{BlockKind, ContentBlock};
pub use footer::truncate_footer;
pub use indent::is_continuation;
pub use pseudo_list::group_pseudo_lists;

/// Runs the full fragmentation pipeline over one chapter's blocks.
pub fn fragment_blocks(chapter_id: &str, blocks: Vec<ContentBlock>) -> Vec<Fragment> {
    let grouped = group_pseudo_lists(blocks);
    let trimmed = truncate_footer(grouped);
    assemble_fragments(chapter_id, &trimmed)
}
