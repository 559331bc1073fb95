use super::{DocumentError, DocumentSink, DocumentSource};
use crate::layout::{LayoutConfig, RenderedPage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use std::path::Path;

/// Read-only PDF source. Page texts are extracted once at open time; the
/// file is never touched again for the lifetime of the value.
pub struct PdfSource {
    pages: Vec<String>,
}

impl PdfSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocumentError::FileNotFound(path.to_path_buf()));
        }

        let buffer = std::fs::read(path)?;
        let pages = pdf_extract::extract_text_from_mem_by_pages(&buffer)
            .map_err(|e| DocumentError::Parse(e.to_string()))?;
        Ok(Self { pages })
    }
}

impl DocumentSource for PdfSource {
    fn page_texts(&self) -> &[String] {
        &self.pages
    }
}

/// Destination PDF built page by page and written once at finalize time.
pub struct PdfSink {
    config: LayoutConfig,
    pages: Vec<RenderedPage>,
}

impl PdfSink {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
        }
    }

    fn build_document(&self) -> Result<lopdf::Document, DocumentError> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in &self.pages {
            let mut operations = Vec::new();
            for line in &page.lines {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec!["F1".into(), Object::Real(self.config.font_size)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Real(line.x), Object::Real(line.y)],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(line.text.as_str())],
                ));
                operations.push(Operation::new("ET", vec![]));
            }

            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| DocumentError::Write(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(self.config.page_width),
                Object::Real(self.config.page_height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }
}

impl DocumentSink for PdfSink {
    fn append_page(&mut self, page: &RenderedPage) {
        self.pages.push(page.clone());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn write(&self, path: &Path) -> Result<(), DocumentError> {
        let mut doc = self.build_document()?;
        doc.compress();
        doc.save(path)
            .map_err(|e| DocumentError::Write(e.to_string()))?;
        Ok(())
    }
}
