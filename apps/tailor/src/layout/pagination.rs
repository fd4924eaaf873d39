//! Layout pass and footer-stamping pass.
//!
//! `render` consumes block tokens and places every word as a positioned run on a page,
//! breaking pages at the printable limit. Nothing is drawn here; the PDF writer replays
//! the runs. `stamp_footers` runs afterwards, once the page count is final.
//!
//! All coordinates are points measured from the top-left corner of the page.

use std::mem;

use serde::Serialize;

use crate::layout::blocks::{Block, BlockKind};
use crate::layout::font_metrics::{get_metrics, to_winansi, FontWeight};
use crate::layout::inline::{parse_spans, SpanKind};
use crate::layout::style::{PageGeometry, StyleRule, StyleSheet};

/// Body line-heights that must fit below an H2/H3 for it to stay on the current page.
pub const MIN_TRAILING_LINES: f32 = 3.0;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// One styled piece of text at a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedRun {
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
    pub text: String,
    pub weight: FontWeight,
    pub size_pt: f32,
    pub color_hex: &'static str,
    pub link: Option<String>,
}

/// A block (or the part of it that landed on one page) with its vertical extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub top: f32,
    pub bottom: f32,
    pub runs: Vec<PlacedRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Zero-based.
    pub index: usize,
    /// Distance from the top margin to the bottom of the lowest block.
    pub content_height: f32,
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalPage {
    pub page: Page,
    pub footer: PlacedRun,
}

/// A rendered document whose pages all carry `Page i of N` footers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<FinalPage>,
}

// ────────────────────────────────────────────────────────────────────────────
// Word clusters
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Word {
    text: String,
    weight: FontWeight,
    color_hex: &'static str,
    link: Option<String>,
    width: f32,
}

/// Words with no whitespace between them (e.g. a bold word and its trailing comma).
/// Lines only break between clusters.
#[derive(Debug, Clone, Default)]
struct Cluster {
    words: Vec<Word>,
    width: f32,
}

impl Cluster {
    fn push(&mut self, word: Word) {
        self.width += word.width;
        self.words.push(word);
    }
}

/// Splits a block's text into clusters, styling each word from its inline span.
fn clusters_for(block: &Block, style: &StyleRule, sheet: &StyleSheet) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut current = Cluster::default();
    let mut pending_space = false;

    let mut push_word = |current: &mut Cluster, word: Word, space_before: bool| {
        if space_before && !current.words.is_empty() {
            clusters.push(mem::take(current));
        }
        current.push(word);
    };

    if matches!(block, Block::Bullet { .. }) {
        let marker = sheet.bullet_marker;
        push_word(
            &mut current,
            Word {
                text: marker.to_string(),
                weight: FontWeight::Regular,
                color_hex: style.color_hex,
                link: None,
                width: get_metrics(FontWeight::Regular).width_pt(marker, style.size_pt),
            },
            false,
        );
        pending_space = true;
    }

    for span in parse_spans(block.text()) {
        let (weight, color_hex, link) = match span.kind {
            SpanKind::Plain => (style.font_weight, style.color_hex, None),
            SpanKind::Bold => (FontWeight::Bold, style.color_hex, None),
            SpanKind::Link { url } => (style.font_weight, sheet.link_color_hex, Some(url)),
        };
        let metrics = get_metrics(weight);

        let mut text = String::new();
        let mut space_before = pending_space;
        for ch in to_winansi(&span.text).chars() {
            if ch.is_whitespace() {
                if !text.is_empty() {
                    let word = Word {
                        width: metrics.width_pt(&text, style.size_pt),
                        text: mem::take(&mut text),
                        weight,
                        color_hex,
                        link: link.clone(),
                    };
                    push_word(&mut current, word, space_before);
                }
                pending_space = true;
            } else {
                if text.is_empty() {
                    space_before = pending_space;
                    pending_space = false;
                }
                text.push(ch);
            }
        }
        if !text.is_empty() {
            let word = Word {
                width: metrics.width_pt(&text, style.size_pt),
                text,
                weight,
                color_hex,
                link: link.clone(),
            };
            push_word(&mut current, word, space_before);
        }
    }

    if !current.words.is_empty() {
        clusters.push(current);
    }
    clusters
}

/// Greedy line breaking. A cluster wider than the line gets a line of its own.
fn wrap_clusters(clusters: Vec<Cluster>, max_width: f32, space_width: f32) -> Vec<Vec<Cluster>> {
    let mut lines = Vec::new();
    let mut line: Vec<Cluster> = Vec::new();
    let mut width = 0.0_f32;

    for cluster in clusters {
        let gap = if line.is_empty() { 0.0 } else { space_width };
        if !line.is_empty() && width + gap + cluster.width > max_width {
            lines.push(mem::take(&mut line));
            width = cluster.width;
        } else {
            width += gap + cluster.width;
        }
        line.push(cluster);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrapped height of a block at the given width, without placing it.
fn measure_block(block: &Block, sheet: &StyleSheet, width: f32) -> f32 {
    let style = sheet.for_kind(block.kind());
    let clusters = clusters_for(block, style, sheet);
    let space = get_metrics(style.font_weight).space_pt(style.size_pt);
    wrap_clusters(clusters, width, space).len() as f32 * style.line_height()
}

// ────────────────────────────────────────────────────────────────────────────
// Layout pass
// ────────────────────────────────────────────────────────────────────────────

/// Page buffer plus vertical cursor.
struct Paginator<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
    /// True until something is placed on the current page.
    fresh_page: bool,
}

impl<'a> Paginator<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page {
                index: 0,
                content_height: 0.0,
                blocks: Vec::new(),
            },
            cursor: geometry.content_top(),
            fresh_page: true,
        }
    }

    fn break_page(&mut self) {
        let next = Page {
            index: self.current.index + 1,
            content_height: 0.0,
            blocks: Vec::new(),
        };
        self.pages.push(mem::replace(&mut self.current, next));
        self.cursor = self.geometry.content_top();
        self.fresh_page = true;
    }

    fn push_block(&mut self, block: TextBlock) {
        if block.runs.is_empty() {
            return;
        }
        self.current.content_height = self
            .current
            .content_height
            .max(block.bottom - self.geometry.content_top());
        self.current.blocks.push(block);
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Lays out blocks into pages.
pub fn render(blocks: &[Block], sheet: &StyleSheet, geometry: &PageGeometry) -> RenderedDocument {
    let mut paginator = Paginator::new(geometry);
    let limit = geometry.printable_limit();
    let allowance = MIN_TRAILING_LINES * sheet.body.line_height();

    for (position, block) in blocks.iter().enumerate() {
        let kind = block.kind();
        let style = sheet.for_kind(kind);
        let indent = if kind == BlockKind::Bullet {
            sheet.bullet_indent_pt
        } else {
            0.0
        };
        let left = geometry.margin_pt + indent;
        let width = geometry.content_width() - indent;

        let pre_gap = if paginator.fresh_page {
            0.0
        } else {
            style.pre_gap_pt.unwrap_or(0.0)
        };

        if is_section_heading(kind) && !paginator.fresh_page {
            let mut needed = pre_gap + measure_block(block, sheet, width) + allowance;
            // A subheading directly below must land on the same page as this heading.
            if let Some(next) = blocks.get(position + 1).filter(|b| is_section_heading(b.kind())) {
                let next_style = sheet.for_kind(next.kind());
                needed += style.paragraph_gap_pt
                    + next_style.pre_gap_pt.unwrap_or(0.0)
                    + measure_block(next, sheet, geometry.content_width());
            }
            if paginator.cursor + needed > limit {
                paginator.break_page();
            }
        }
        if !paginator.fresh_page {
            paginator.cursor += pre_gap;
        }

        let space = get_metrics(style.font_weight).space_pt(style.size_pt);
        let lines = wrap_clusters(clusters_for(block, style, sheet), width, space);
        let line_height = style.line_height();
        let line_count = lines.len();

        let mut placed = TextBlock {
            kind,
            top: paginator.cursor,
            bottom: paginator.cursor,
            runs: Vec::new(),
        };

        for (i, line) in lines.into_iter().enumerate() {
            if paginator.cursor + line_height > limit && !paginator.fresh_page {
                placed.bottom = paginator.cursor;
                paginator.push_block(placed);
                paginator.break_page();
                placed = TextBlock {
                    kind,
                    top: paginator.cursor,
                    bottom: paginator.cursor,
                    runs: Vec::new(),
                };
            }

            let justify = kind == BlockKind::Paragraph && i + 1 < line_count;
            let baseline = paginator.cursor + style.size_pt;
            place_line(line, left, width, space, baseline, style, justify, &mut placed.runs);

            paginator.cursor += line_height;
            paginator.fresh_page = false;
        }

        placed.bottom = paginator.cursor;
        paginator.push_block(placed);
        paginator.cursor += style.paragraph_gap_pt;
    }

    RenderedDocument {
        geometry: *geometry,
        pages: paginator.finish(),
    }
}

fn is_section_heading(kind: BlockKind) -> bool {
    matches!(kind, BlockKind::Heading(2) | BlockKind::Heading(3))
}

/// Positions one wrapped line. Justified lines spread the slack across inter-cluster gaps.
#[allow(clippy::too_many_arguments)]
fn place_line(
    line: Vec<Cluster>,
    left: f32,
    width: f32,
    space: f32,
    baseline: f32,
    style: &StyleRule,
    justify: bool,
    runs: &mut Vec<PlacedRun>,
) {
    let gaps = line.len().saturating_sub(1);
    let natural: f32 = line.iter().map(|c| c.width).sum::<f32>() + gaps as f32 * space;
    let gap = if justify && gaps > 0 && natural < width {
        space + (width - natural) / gaps as f32
    } else {
        space
    };

    let mut x = left;
    for (i, cluster) in line.into_iter().enumerate() {
        if i > 0 {
            x += gap;
        }
        for word in cluster.words {
            runs.push(PlacedRun {
                x,
                baseline,
                width: word.width,
                text: word.text,
                weight: word.weight,
                size_pt: style.size_pt,
                color_hex: word.color_hex,
                link: word.link,
            });
            x += word.width;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Footer pass
// ────────────────────────────────────────────────────────────────────────────

pub fn footer_text(page_number: usize, total: usize) -> String {
    format!("Page {page_number} of {total}")
}

/// Stamps `Page i of N` on every page, centered across the full page width inside the
/// bottom margin band. Footers are the only runs placed below the printable limit.
pub fn stamp_footers(document: RenderedDocument, sheet: &StyleSheet) -> FinalDocument {
    let geometry = document.geometry;
    let total = document.pages.len();
    let style = &sheet.footer;
    let metrics = get_metrics(style.font_weight);
    let baseline = geometry.height_pt - geometry.margin_pt + geometry.footer_offset_pt;

    let pages = document
        .pages
        .into_iter()
        .map(|page| {
            let text = footer_text(page.index + 1, total);
            let width = metrics.width_pt(&text, style.size_pt);
            FinalPage {
                footer: PlacedRun {
                    x: (geometry.width_pt - width) / 2.0,
                    baseline,
                    width,
                    text,
                    weight: style.font_weight,
                    size_pt: style.size_pt,
                    color_hex: style.color_hex,
                    link: None,
                },
                page,
            }
        })
        .collect();

    FinalDocument { geometry, pages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::parse_blocks;

    const FILLER: &str = "Designed and operated data pipelines that ingest event streams from \
        dozens of services, reconciled billing records nightly, and published curated tables \
        for analysts across finance, growth and support teams.";

    fn layout(markdown: &str) -> FinalDocument {
        let sheet = StyleSheet::default();
        let doc = render(&parse_blocks(markdown), &sheet, &PageGeometry::default());
        stamp_footers(doc, &sheet)
    }

    fn many_sections(count: usize) -> String {
        let mut md = String::from("# Jane Doe\n\n");
        for n in 0..count {
            md.push_str(&format!("## Section {n}\n\n"));
            md.push_str(&format!("### Role {n}\n"));
            md.push_str(&format!("{FILLER}\n- {FILLER}\n- Shipped release {n}\n\n"));
        }
        md
    }

    #[test]
    fn test_title_and_paragraph_is_one_page() {
        let doc = layout("# Jane Doe\n\nBackend engineer with ten years of Python and Go.");
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].footer.text, "Page 1 of 1");
        assert_eq!(doc.pages[0].page.blocks.len(), 2);
    }

    #[test]
    fn test_empty_input_still_has_one_page() {
        let doc = layout("\n\n");
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.pages[0].page.blocks.is_empty());
    }

    #[test]
    fn test_blank_lines_reserve_no_space() {
        let tight = layout("# Jane\nBody");
        let loose = layout("# Jane\n\n\n\nBody");
        assert_eq!(tight, loose);
    }

    #[test]
    fn test_footers_number_every_page() {
        let doc = layout(&many_sections(12));
        let total = doc.pages.len();
        assert!(total > 1, "expected multiple pages, got {total}");
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.footer.text, format!("Page {} of {}", i + 1, total));
            assert_eq!(page.page.index, i);
        }
    }

    #[test]
    fn test_footer_is_centered_in_bottom_margin() {
        let doc = layout("# Title");
        let g = doc.geometry;
        let footer = &doc.pages[0].footer;
        let center = footer.x + footer.width / 2.0;
        assert!((center - g.width_pt / 2.0).abs() < 0.01);
        assert!(footer.baseline > g.height_pt - g.margin_pt);
        assert!(footer.baseline < g.height_pt);
    }

    #[test]
    fn test_content_stays_inside_printable_area() {
        let doc = layout(&many_sections(12));
        let limit = doc.geometry.printable_limit();
        for page in &doc.pages {
            for block in &page.page.blocks {
                assert!(block.bottom <= limit + 0.01, "block overflows: {}", block.bottom);
                assert!(block.top >= doc.geometry.content_top() - 0.01);
            }
            let printable = doc.geometry.printable_limit() - doc.geometry.content_top();
            assert!(page.page.content_height <= printable + 0.01);
        }
    }

    #[test]
    fn test_headings_are_not_stranded() {
        let doc = layout(&many_sections(12));
        let limit = doc.geometry.printable_limit();
        let allowance = MIN_TRAILING_LINES * StyleSheet::default().body.line_height();

        for (p, page) in doc.pages.iter().enumerate() {
            for (b, block) in page.page.blocks.iter().enumerate() {
                if matches!(block.kind, BlockKind::Heading(2) | BlockKind::Heading(3)) && b > 0 {
                    assert!(
                        block.bottom + allowance <= limit + 0.01,
                        "heading on page {p} leaves {} pt below it",
                        limit - block.bottom
                    );
                }
            }
            if p + 1 < doc.pages.len() {
                let last = page.page.blocks.last().map(|b| b.kind);
                assert!(
                    !matches!(last, Some(BlockKind::Heading(2)) | Some(BlockKind::Heading(3))),
                    "page {p} ends with a heading"
                );
            }
        }
    }

    #[test]
    fn test_h2_pre_gap_skipped_at_page_top() {
        let sheet = StyleSheet::default();
        let geometry = PageGeometry::default();
        let doc = render(&parse_blocks("## Skills\nPython, Go"), &sheet, &geometry);
        let heading = &doc.pages[0].blocks[0];
        assert_eq!(heading.top, geometry.content_top());

        let doc = render(&parse_blocks("Intro\n## Skills"), &sheet, &geometry);
        let intro = &doc.pages[0].blocks[0];
        let heading = &doc.pages[0].blocks[1];
        let expected = intro.bottom + sheet.body.paragraph_gap_pt + 10.0;
        assert!((heading.top - expected).abs() < 0.01);
    }

    /// 35 one-word paragraphs leave the cursor at 684.375pt: one more H1 line (25pt)
    /// still fits under the 712pt limit, but the three-line allowance would not.
    fn filled_page_then(heading: &str) -> RenderedDocument {
        let mut md = "x\n".repeat(35);
        md.push_str(heading);
        render(&parse_blocks(&md), &StyleSheet::default(), &PageGeometry::default())
    }

    #[test]
    fn test_h1_never_looks_ahead() {
        let doc = filled_page_then("# Title");
        assert_eq!(doc.pages.len(), 1);

        let title = doc.pages[0].blocks.last().unwrap();
        assert_eq!(title.kind, BlockKind::Heading(1));
        assert!((title.top - 684.375).abs() < 0.01);
        assert!(title.bottom <= doc.geometry.printable_limit());
    }

    #[test]
    fn test_h2_in_same_spot_moves_to_next_page() {
        let doc = filled_page_then("## Title");
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[1].blocks[0].kind, BlockKind::Heading(2));
        assert_eq!(doc.pages[1].blocks[0].top, doc.geometry.content_top());
    }

    #[test]
    fn test_bold_link_bullet_flows_as_one_paragraph() {
        let doc = layout("- **Bold** item [link](http://x.test)");
        let blocks = &doc.pages[0].page.blocks;
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.kind, BlockKind::Bullet);

        let texts: Vec<&str> = block.runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["\u{2022}", "Bold", "item", "link"]);
        assert_eq!(block.runs[1].weight, FontWeight::Bold);
        assert_eq!(block.runs[2].weight, FontWeight::Regular);
        assert_eq!(block.runs[3].link.as_deref(), Some("http://x.test"));

        // One line: every run shares a baseline and x increases left to right.
        assert!(block.runs.iter().all(|r| r.baseline == block.runs[0].baseline));
        assert!(block.runs.windows(2).all(|w| w[0].x < w[1].x));
        assert!(block.runs[0].x >= doc.geometry.margin_pt + StyleSheet::default().bullet_indent_pt);
    }

    #[test]
    fn test_paragraph_lines_are_justified_except_last() {
        let doc = layout(FILLER);
        let block = &doc.pages[0].page.blocks[0];
        let right_edge = doc.geometry.width_pt - doc.geometry.margin_pt;

        let mut baselines: Vec<f32> = block.runs.iter().map(|r| r.baseline).collect();
        baselines.dedup();
        assert!(baselines.len() >= 2, "filler should wrap");

        let first_line_end = block
            .runs
            .iter()
            .filter(|r| r.baseline == baselines[0])
            .map(|r| r.x + r.width)
            .fold(0.0_f32, f32::max);
        assert!((first_line_end - right_edge).abs() < 0.5);

        let last_line_end = block
            .runs
            .iter()
            .filter(|r| r.baseline == *baselines.last().unwrap())
            .map(|r| r.x + r.width)
            .fold(0.0_f32, f32::max);
        assert!(last_line_end < right_edge - 1.0);
    }

    #[test]
    fn test_unencodable_symbols_are_replaced_before_measuring() {
        let sheet = StyleSheet::default();
        let block = Block::Paragraph {
            text: "Python \u{2192} Go \u{2713} done".to_string(),
        };
        let words: Vec<String> = clusters_for(&block, &sheet.body, &sheet)
            .into_iter()
            .flat_map(|c| c.words)
            .map(|w| w.text)
            .collect();
        assert_eq!(words, vec!["Python", "->", "Go", "done"]);
    }

    #[test]
    fn test_bullet_marker_measured_at_glyph_width() {
        let sheet = StyleSheet::default();
        let block = Block::Bullet {
            text: "Item".to_string(),
        };
        let marker = &clusters_for(&block, &sheet.bullet, &sheet)[0].words[0];
        assert!((marker.width - 0.350 * sheet.bullet.size_pt).abs() < 1e-4);
    }

    #[test]
    fn test_attached_punctuation_stays_with_word() {
        let sheet = StyleSheet::default();
        let block = Block::Paragraph {
            text: "**Rust**, Go".to_string(),
        };
        let clusters = clusters_for(&block, &sheet.body, &sheet);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].words.len(), 2);
        assert_eq!(clusters[0].words[0].weight, FontWeight::Bold);
        assert_eq!(clusters[0].words[1].text, ",");
    }

    #[test]
    fn test_long_paragraph_splits_across_pages() {
        let md = std::iter::repeat(FILLER).take(120).collect::<Vec<_>>().join(" ");
        let doc = layout(&md);
        assert!(doc.pages.len() >= 2);
        assert_eq!(doc.pages[1].page.blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(doc.pages[1].page.blocks[0].top, doc.geometry.content_top());
    }
}
