// Markdown subset -> paginated layout.
// Block tokenizer, inline spans, static styles and font metrics feed the pagination pass.
// Layout is pure and CPU-bound; the PDF writer in `render` consumes its output.

pub mod blocks;
pub mod font_metrics;
pub mod inline;
pub mod pagination;
pub mod style;

pub use blocks::parse_blocks;
pub use pagination::{render, stamp_footers, FinalDocument, PlacedRun};
pub use style::{PageGeometry, StyleSheet};

/// Parses, lays out and stamps footers in one go.
pub fn layout_markdown(
    markdown: &str,
    sheet: &StyleSheet,
    geometry: &PageGeometry,
) -> FinalDocument {
    let blocks = parse_blocks(markdown);
    stamp_footers(render(&blocks, sheet, geometry), sheet)
}
