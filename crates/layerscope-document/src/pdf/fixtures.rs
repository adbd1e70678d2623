// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory PDF builders for tests and benches. Compiled for this crate's own
// tests and, through the `test-fixtures` feature, for downstream crates.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// One page of a fixture document.
#[derive(Debug, Clone, Default)]
pub struct FixturePage {
    /// Text drawn with a single `Tj`. `None` leaves the page blank.
    pub text: Option<String>,
    /// Add a `/Properties` entry to the page resources.
    pub marked_content_properties: bool,
    /// Add an `/ExtGState` entry that carries `/OC`.
    pub optional_content_gstate: bool,
}

impl FixturePage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }
}

/// Builder for small uncompressed PDFs.
#[derive(Debug, Clone, Default)]
pub struct FixtureBuilder {
    pages: Vec<FixturePage>,
    /// Number of OCGs declared in the catalog. `Some(0)` writes an empty
    /// `/OCGs` array; `None` omits `/OCProperties`.
    catalog_layers: Option<usize>,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: FixturePage) -> Self {
        self.pages.push(page);
        self
    }

    pub fn catalog_layers(mut self, count: usize) -> Self {
        self.catalog_layers = Some(count);
        self
    }

    /// Serialise the document.
    ///
    /// # Panics
    ///
    /// If lopdf cannot write the object graph. Fixtures are test-only, so a
    /// broken builder fails the test instead of yielding empty bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let references_layers = self
            .pages
            .iter()
            .any(|page| page.marked_content_properties || page.optional_content_gstate);
        let layer_count = match self.catalog_layers {
            Some(count) => count.max(usize::from(references_layers)),
            None => usize::from(references_layers),
        };
        let ocg_ids: Vec<Object> = (0..layer_count)
            .map(|index| {
                doc.add_object(dictionary! {
                    "Type" => "OCG",
                    "Name" => Object::string_literal(format!("Layer {}", index + 1)),
                })
                .into()
            })
            .collect();

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let mut operations = Vec::new();
            if let Some(text) = &page.text {
                operations = vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                    Operation::new("ET", vec![]),
                ];
            }
            let content = Content { operations }
                .encode()
                .unwrap_or_default();
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

            let mut resources = dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            };
            if page.marked_content_properties {
                resources.set("Properties", dictionary! { "MC0" => ocg_ids[0].clone() });
            }
            if page.optional_content_gstate {
                resources.set(
                    "ExtGState",
                    dictionary! { "GS0" => dictionary! { "OC" => ocg_ids[0].clone() } },
                );
            }

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources,
            });
            kids.push(Object::from(page_id));
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if let Some(count) = self.catalog_layers {
            let declared: Vec<Object> = ocg_ids.iter().take(count).cloned().collect();
            catalog.set(
                "OCProperties",
                dictionary! {
                    "OCGs" => declared.clone(),
                    "D" => dictionary! { "Order" => declared },
                },
            );
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .expect("fixture document should serialise");
        assert!(!output.is_empty(), "fixture document serialised to nothing");
        output
    }
}

/// A single-page document with the given text and no layers.
pub fn plain_pdf(text: &str) -> Vec<u8> {
    FixtureBuilder::new().page(FixturePage::text(text)).build()
}

/// A single blank page, no text, no layers.
pub fn blank_pdf() -> Vec<u8> {
    FixtureBuilder::new().page(FixturePage::blank()).build()
}
