use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Pt, Rgb,
};

use super::{Canvas, Font};
use crate::error::ExportError;

const LAYER: &str = "Layer 1";

fn render_err(err: impl std::fmt::Display) -> ExportError {
    ExportError::Render(err.to_string())
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

/// [`Canvas`] backed by `printpdf`, using the built-in Helvetica faces.
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    font: Font,
    size: f32,
    width: f32,
    height: f32,
}

impl PdfCanvas {
    /// Starts a document whose first page is `width` × `height` points.
    pub fn new(title: &str, width: f32, height: f32) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(title, mm(width), mm(height), LAYER);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_err)?;
        let layer = doc.get_page(page).get_layer(layer);
        let mut canvas = Self {
            doc,
            layer,
            regular,
            bold,
            font: Font::Helvetica,
            size: 12.0,
            width,
            height,
        };
        canvas.prepare_layer();
        Ok(canvas)
    }

    fn prepare_layer(&mut self) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(1.0);
    }
}

impl Canvas for PdfCanvas {
    type Output = Vec<u8>;

    fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.size = size;
    }

    fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        let font = match self.font {
            Font::Helvetica => &self.regular,
            Font::HelveticaBold => &self.bold,
        };
        self.layer.use_text(text, self.size, mm(x), mm(y), font);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(mm(x1), mm(y1)), false),
                (Point::new(mm(x2), mm(y2)), false),
            ],
            is_closed: false,
        });
    }

    fn show_page(&mut self) {
        let (page, layer) = self.doc.add_page(mm(self.width), mm(self.height), LAYER);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.prepare_layer();
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        self.doc.save_to_bytes().map_err(render_err)
    }
}
