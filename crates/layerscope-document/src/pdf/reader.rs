// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: parse documents with `lopdf` and expose the pieces
// of the object model the scanner inspects: catalog, page tree, page
// resources, and per-page text.

use std::collections::BTreeMap;

use layerscope_core::error::LayerscopeError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

/// Guard against cyclic `/Parent` chains when resolving inherited resources.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Read-only view over a parsed PDF.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Parse a PDF already in memory. The scanner always reads the bytes
    /// first because the raw-content heuristic needs them too.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, LayerscopeError> {
        let document = Document::load_mem(data).map_err(|err| {
            LayerscopeError::Pdf(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object IDs keyed by 1-indexed page number.
    pub fn pages(&self) -> BTreeMap<u32, ObjectId> {
        self.document.get_pages()
    }

    /// The document catalog (`/Root`).
    pub fn catalog(&self) -> Result<&Dictionary, LayerscopeError> {
        self.document
            .catalog()
            .map_err(|err| LayerscopeError::Pdf(format!("no catalog: {}", err)))
    }

    /// Follow indirect references until a direct object is reached.
    pub fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object, LayerscopeError> {
        self.document
            .dereference(object)
            .map(|(_, resolved)| resolved)
            .map_err(|err| LayerscopeError::Pdf(format!("cannot resolve reference: {}", err)))
    }

    /// Resolve `object` and require it to be a dictionary.
    pub fn resolve_dict<'a>(
        &'a self,
        object: &'a Object,
    ) -> Result<&'a Dictionary, LayerscopeError> {
        self.resolve(object)?
            .as_dict()
            .map_err(|err| LayerscopeError::Pdf(format!("expected dictionary: {}", err)))
    }

    /// The resource dictionary that applies to a page: its own `/Resources`,
    /// or the nearest one inherited through the `/Parent` chain.
    pub fn page_resources(
        &self,
        page_id: ObjectId,
    ) -> Result<Option<&Dictionary>, LayerscopeError> {
        let mut node = self.document.get_dictionary(page_id).map_err(|err| {
            LayerscopeError::Pdf(format!("cannot read page object {:?}: {}", page_id, err))
        })?;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(resources) = node.get(b"Resources") {
                return self.resolve_dict(resources).map(Some);
            }
            match node.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => {
                    node = self.document.get_dictionary(*parent_id).map_err(|err| {
                        LayerscopeError::Pdf(format!(
                            "cannot read page tree node {:?}: {}",
                            parent_id, err
                        ))
                    })?;
                }
                _ => return Ok(None),
            }
        }

        Ok(None)
    }

    // -- Extraction -----------------------------------------------------------

    /// Extract the text content of a single page (1-indexed).
    pub fn page_text(&self, page_number: u32) -> Result<String, LayerscopeError> {
        self.document.extract_text(&[page_number]).map_err(|err| {
            LayerscopeError::Pdf(format!(
                "text extraction failed on page {}: {}",
                page_number, err
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::plain_pdf;
    use lopdf::dictionary;

    /// One page whose resources live on the parent `/Pages` node.
    fn inherited_resources_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1,
                "Resources" => dictionary! {
                    "Properties" => dictionary! { "MC0" => dictionary! { "Type" => "OCG" } },
                },
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        doc.save_to(&mut output).unwrap();
        output
    }

    #[test]
    fn pages_are_numbered_from_one() {
        let reader = PdfReader::from_bytes(&plain_pdf("x")).unwrap();
        assert_eq!(reader.page_count(), 1);
        assert_eq!(reader.pages().keys().copied().collect::<Vec<_>>(), vec![1]);
        assert!(reader.catalog().is_ok());
    }

    #[test]
    fn resources_inherited_from_parent() {
        let reader = PdfReader::from_bytes(&inherited_resources_pdf()).unwrap();
        let page_id = reader.pages()[&1];
        let resources = reader.page_resources(page_id).unwrap().unwrap();
        assert!(resources.has(b"Properties"));
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!(matches!(
            PdfReader::from_bytes(b"definitely not a pdf"),
            Err(LayerscopeError::Pdf(_))
        ));
    }
}
