//! Writes a conversation out as a paginated document.
//!
//! Layout happens here against the small [`Canvas`] surface; [`PdfCanvas`] turns the drawing
//! calls into a PDF. Coordinates are PDF points with the origin at the bottom-left corner.

pub mod metrics;
mod pdf;

pub use pdf::PdfCanvas;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::info;

use crate::conversation::{Conversation, Role};
use crate::error::ExportError;

pub const PDF_FILE_NAME: &str = "chat_history.pdf";
pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

/// Drawing primitives the layout needs from a document renderer.
pub trait Canvas {
    type Output;

    fn set_font(&mut self, font: Font, size: f32);

    fn string_width(&self, text: &str, font: Font, size: f32) -> f32 {
        metrics::string_width(text, font, size)
    }

    /// Draws `text` with its baseline starting at (`x`, `y`) in the current font.
    fn draw_string(&mut self, x: f32, y: f32, text: &str);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    /// Ends the current page and starts an empty one of the same size.
    fn show_page(&mut self);

    fn finish(self) -> Result<Self::Output, ExportError>;
}

/// Page geometry and typography of the exported transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub line_height: f32,
    pub title: String,
    pub title_size: f32,
    pub body_size: f32,
}

impl Default for PageLayout {
    /// US Letter, 40pt margins, 12pt Helvetica on 20pt lines.
    fn default() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin: 40.0,
            line_height: 20.0,
            title: "Conversation History".to_string(),
            title_size: 16.0,
            body_size: 12.0,
        }
    }
}

impl PageLayout {
    fn text_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }
}

/// Renders the conversation as a PDF held entirely in memory.
pub fn export_pdf(log: &Conversation) -> Result<Vec<u8>, ExportError> {
    let layout = PageLayout::default();
    let canvas = PdfCanvas::new(&layout.title, layout.width, layout.height)?;
    let bytes = render(log, &layout, canvas)?;
    info!(messages = log.len(), bytes = bytes.len(), "exported conversation");
    Ok(bytes)
}

/// `data:` URL carrying a rendered PDF, usable as a download link's `href`.
pub fn data_url(bytes: &[u8]) -> String {
    format!("data:{PDF_MIME_TYPE};base64,{}", STANDARD.encode(bytes))
}

/// A rendered export, remembering which state of the log it was made from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedPdf {
    revision: u64,
    href: String,
}

impl ExportedPdf {
    pub fn new(log: &Conversation) -> Result<Self, ExportError> {
        let bytes = export_pdf(log)?;
        Ok(Self {
            revision: log.revision(),
            href: data_url(&bytes),
        })
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    /// False once `log` has changed since the export was rendered.
    pub fn is_current(&self, log: &Conversation) -> bool {
        self.revision == log.revision()
    }
}

/// Lays `log` out onto `canvas`, one `"{Label}: {content}"` block per message.
///
/// A rule precedes every user message. Blocks wrap at word boundaries and flow onto new pages
/// whenever the cursor reaches the bottom margin; nothing is clipped.
pub fn render<C: Canvas>(
    log: &Conversation,
    layout: &PageLayout,
    mut canvas: C,
) -> Result<C::Output, ExportError> {
    let mut cursor = Cursor {
        y: layout.top(),
        layout,
    };

    canvas.set_font(Font::HelveticaBold, layout.title_size);
    let title_width = canvas.string_width(&layout.title, Font::HelveticaBold, layout.title_size);
    canvas.draw_string((layout.width - title_width) / 2.0, layout.top(), &layout.title);
    cursor.y -= 30.0;
    canvas.set_font(Font::Helvetica, layout.body_size);

    for message in log {
        let text = format!("{}: {}", message.role().label(), message.content());

        if message.role() == Role::User {
            cursor.reserve(&mut canvas, 30.0);
            cursor.y -= 10.0;
            canvas.line(layout.margin, cursor.y, layout.width - layout.margin, cursor.y);
            cursor.y -= 20.0;
        }

        let lines = wrap_text(&text, layout.text_width(), |s| {
            canvas.string_width(s, Font::Helvetica, layout.body_size)
        });
        for line in lines {
            cursor.reserve(&mut canvas, 0.0);
            if !line.is_empty() {
                canvas.draw_string(layout.margin, cursor.y, &line);
            }
            cursor.y -= layout.line_height;
        }
    }

    canvas.finish()
}

struct Cursor<'a> {
    y: f32,
    layout: &'a PageLayout,
}

impl Cursor<'_> {
    // Moves to a fresh page when drawing `extra` points below the cursor would cross the margin.
    fn reserve<C: Canvas>(&mut self, canvas: &mut C, extra: f32) {
        if self.y - extra < self.layout.margin {
            canvas.show_page();
            canvas.set_font(Font::Helvetica, self.layout.body_size);
            self.y = self.layout.top();
        }
    }
}

/// Splits `text` into lines no wider than `max_width`, breaking only between words.
///
/// Explicit newlines always break; an empty paragraph yields an empty line. A word wider than
/// `max_width` on its own is kept whole on a line of its own.
pub fn wrap_text<W>(text: &str, max_width: f32, width: W) -> Vec<String>
where
    W: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if width(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}
