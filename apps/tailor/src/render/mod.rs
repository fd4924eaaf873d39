//! PDF writer: replays a laid-out document onto printpdf pages.
//!
//! Layout coordinates are points from the top-left corner; PDF space starts bottom-left,
//! so every y is flipped against the page height here and nowhere else.

use std::path::Path;

use printpdf::{
    Actions, BuiltinFont, Color, IndirectFontRef, LinkAnnotation, Mm, PdfDocument,
    PdfLayerReference, Pt, Rect, Rgb,
};
use thiserror::Error;
use tracing::debug;

use crate::layout::font_metrics::FontWeight;
use crate::layout::style::hex_to_rgb;
use crate::layout::{FinalDocument, PlacedRun};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Pdf(String),

    #[error("Failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn for_weight(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn pt_to_mm(value: f32) -> Mm {
    Mm::from(Pt(value))
}

/// Converts a top-down layout y into PDF space.
fn flip_y(page_height_pt: f32, y: f32) -> f32 {
    page_height_pt - y
}

/// Serializes the document to PDF bytes.
pub fn to_pdf_bytes(document: &FinalDocument, title: &str) -> Result<Vec<u8>, RenderError> {
    let geometry = document.geometry;
    let width = pt_to_mm(geometry.width_pt);
    let height = pt_to_mm(geometry.height_pt);

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?,
    };

    for (i, final_page) in document.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(width, height, "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let runs = final_page
            .page
            .blocks
            .iter()
            .flat_map(|block| block.runs.iter())
            .chain(std::iter::once(&final_page.footer));
        for run in runs {
            draw_run(&layer, &fonts, geometry.height_pt, run);
        }
    }

    debug!(pages = document.pages.len(), "PDF assembled");
    doc.save_to_bytes().map_err(|e| RenderError::Pdf(e.to_string()))
}

fn draw_run(layer: &PdfLayerReference, fonts: &Fonts, page_height: f32, run: &PlacedRun) {
    let (r, g, b) = hex_to_rgb(run.color_hex);
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    layer.use_text(
        run.text.clone(),
        run.size_pt,
        pt_to_mm(run.x),
        pt_to_mm(flip_y(page_height, run.baseline)),
        fonts.for_weight(run.weight),
    );

    if let Some(url) = &run.link {
        let top = run.baseline - run.size_pt;
        let bottom = run.baseline + run.size_pt * 0.25;
        let rect = Rect::new(
            pt_to_mm(run.x),
            pt_to_mm(flip_y(page_height, bottom)),
            pt_to_mm(run.x + run.width),
            pt_to_mm(flip_y(page_height, top)),
        );
        layer.add_link_annotation(LinkAnnotation::new(
            rect,
            None,
            None,
            Actions::uri(url.clone()),
            None,
        ));
    }
}

/// Renders and writes the PDF to `path`.
pub async fn write_pdf(
    document: &FinalDocument,
    title: &str,
    path: &Path,
) -> Result<(), RenderError> {
    let bytes = to_pdf_bytes(document, title)?;
    tokio::fs::write(path, &bytes).await?;
    debug!(path = %path.display(), bytes = bytes.len(), "PDF written");
    Ok(())
}
