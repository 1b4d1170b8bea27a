//! PDF codec on top of `lopdf`.
//!
//! Pages are copied by whitelist: the page dictionary (with inherited
//! attributes pulled down from its ancestors) plus every object reachable
//! from it, renumbered into the output document. Objects already imported
//! into a sink are reused by later pages of the same part. The walk stops at
//! other pages: links to pages of the same part are resolved to their copies,
//! links to pages outside the part become `null`.

use super::{Codec, PageSink, PageSource};
use crate::error::{PdfSplitterError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Page attributes a page may inherit from its `Pages` ancestors.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

#[derive(Debug, Clone)]
pub struct PdfCodec {
    version: String,
}

impl PdfCodec {
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl Default for PdfCodec {
    fn default() -> Self {
        Self::with_version("1.7")
    }
}

#[derive(Debug, Clone)]
pub struct PdfSource {
    document: Arc<Document>,
    page_ids: Vec<ObjectId>,
}

impl PdfSource {
    pub fn new(document: Document) -> Self {
        let page_ids = document.get_pages().into_values().collect();
        Self {
            document: Arc::new(document),
            page_ids,
        }
    }
}

/// Handle to a page of an opened source; copying happens on append.
#[derive(Debug, Clone)]
pub struct PdfPage {
    document: Arc<Document>,
    id: ObjectId,
}

impl PageSource for PdfSource {
    type Page = PdfPage;

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, index: usize) -> Result<PdfPage> {
        let id = *self
            .page_ids
            .get(index)
            .ok_or_else(|| PdfSplitterError::CodecRead {
                reason: format!(
                    "page index {} out of range (document has {} pages)",
                    index,
                    self.page_ids.len()
                ),
            })?;
        Ok(PdfPage {
            document: Arc::clone(&self.document),
            id,
        })
    }
}

pub struct PdfSink {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    origin: Option<Arc<Document>>,
    // source object id -> sink object id, valid for `origin`
    imported: BTreeMap<ObjectId, ObjectId>,
    // sink ids held for linked pages that have not been appended (yet)
    reserved_pages: BTreeSet<ObjectId>,
}

impl PdfSink {
    fn new(version: &str) -> Self {
        let mut document = Document::with_version(version);
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
            origin: None,
            imported: BTreeMap::new(),
            reserved_pages: BTreeSet::new(),
        }
    }
}

impl PageSink for PdfSink {
    type Page = PdfPage;

    fn append(&mut self, page: PdfPage) -> Result<()> {
        let same_origin = self
            .origin
            .as_ref()
            .is_some_and(|origin| Arc::ptr_eq(origin, &page.document));
        if !same_origin {
            self.imported.clear();
            self.origin = Some(Arc::clone(&page.document));
        }

        let source = page.document.as_ref();
        let mut dictionary =
            page_dictionary(source, page.id).map_err(|e| PdfSplitterError::CodecRead {
                reason: format!("page object {} {}: {}", page.id.0, page.id.1, e),
            })?;

        // A page linked from an earlier page of this part already owns a
        // reserved id.
        let document = &mut self.document;
        let page_id = *self
            .imported
            .entry(page.id)
            .or_insert_with(|| document.new_object_id());
        self.reserved_pages.remove(&page_id);

        // Walk everything the page reaches that this sink does not hold yet,
        // stopping at other pages and page tree nodes. BTreeMap keeps the new
        // numbering stable from run to run.
        let mut pending = Vec::new();
        dictionary
            .iter()
            .for_each(|(_, value)| references(value, &mut pending));
        let mut discovered = BTreeMap::new();
        let mut linked_pages = BTreeSet::new();
        while let Some(id) = pending.pop() {
            if self.imported.contains_key(&id) || discovered.contains_key(&id) {
                continue;
            }
            let Ok(object) = source.get_object(id) else {
                continue;
            };
            match page_tree_type(object) {
                Some(PageTreeNode::Page) => {
                    linked_pages.insert(id);
                }
                Some(PageTreeNode::Pages) => {}
                None => {
                    references(object, &mut pending);
                    discovered.insert(id, object.clone());
                }
            }
        }

        for id in linked_pages {
            let new_id = self.document.new_object_id();
            self.imported.insert(id, new_id);
            self.reserved_pages.insert(new_id);
        }
        for &id in discovered.keys() {
            let new_id = self.document.new_object_id();
            self.imported.insert(id, new_id);
        }

        debug!(
            "Importing page object {} {} with {} new dependencies",
            page.id.0,
            page.id.1,
            discovered.len()
        );

        for (id, mut object) in discovered {
            remap(&mut object, &self.imported);
            if let Some(&new_id) = self.imported.get(&id) {
                self.document.objects.insert(new_id, object);
            }
        }

        remap_dictionary(&mut dictionary, &self.imported);
        dictionary.set("Parent", Object::Reference(self.pages_id));
        self.document
            .objects
            .insert(page_id, Object::Dictionary(dictionary));
        self.kids.push(Object::Reference(page_id));
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.kids.len()
    }

    fn save(self, path: &Path) -> Result<()> {
        let mut document = self.document;
        let count = self.kids.len() as i64;

        // Links to pages that ended up outside this part.
        if !self.reserved_pages.is_empty() {
            for object in document.objects.values_mut() {
                rewrite_references(object, &|id| {
                    (!self.reserved_pages.contains(&id)).then_some(id)
                });
            }
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.kids)),
            ("Count", Object::Integer(count)),
        ]);
        document.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]);
        let catalog_id = document.add_object(catalog);
        document.trailer.set("Root", Object::Reference(catalog_id));
        document
            .trailer
            .set("Size", Object::Integer(document.max_id as i64 + 1));

        document
            .save(path)
            .map_err(|e| PdfSplitterError::CodecWrite {
                reason: format!("{}: {}", path.display(), e),
            })?;
        Ok(())
    }
}

impl Codec for PdfCodec {
    type Page = PdfPage;
    type Source = PdfSource;
    type Sink = PdfSink;

    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn open(&self, path: &Path) -> Result<PdfSource> {
        let document = Document::load(path).map_err(|e| PdfSplitterError::CodecRead {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Ok(PdfSource::new(document))
    }

    fn create(&self) -> PdfSink {
        PdfSink::new(&self.version)
    }
}

/// The page dictionary with inherited attributes made explicit and the
/// `Parent` link dropped.
fn page_dictionary(document: &Document, page_id: ObjectId) -> lopdf::Result<Dictionary> {
    let mut page = document.get_dictionary(page_id)?.clone();
    let mut visited = BTreeSet::from([page_id]);
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    while let Some(node_id) = parent {
        if !visited.insert(node_id) {
            break;
        }
        let Ok(node) = document.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key, value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    page.remove(b"Parent");
    Ok(page)
}

enum PageTreeNode {
    Page,
    Pages,
}

fn page_tree_type(object: &Object) -> Option<PageTreeNode> {
    let dictionary = object.as_dict().ok()?;
    match dictionary.get(b"Type").and_then(Object::as_name) {
        Ok(b"Page") => Some(PageTreeNode::Page),
        Ok(b"Pages") => Some(PageTreeNode::Pages),
        _ => None,
    }
}

fn references(object: &Object, out: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => out.push(*id),
        Object::Array(items) => items.iter().for_each(|item| references(item, out)),
        Object::Dictionary(dictionary) => {
            dictionary.iter().for_each(|(_, value)| references(value, out))
        }
        Object::Stream(stream) => stream
            .dict
            .iter()
            .for_each(|(_, value)| references(value, out)),
        _ => {}
    }
}

/// Rewrites references through `ids`; references that were not imported
/// become `null`.
fn remap(object: &mut Object, ids: &BTreeMap<ObjectId, ObjectId>) {
    rewrite_references(object, &|id| ids.get(&id).copied());
}

fn remap_dictionary(dictionary: &mut Dictionary, ids: &BTreeMap<ObjectId, ObjectId>) {
    for (_, value) in dictionary.iter_mut() {
        remap(value, ids);
    }
}

fn rewrite_references<F>(object: &mut Object, resolve: &F)
where
    F: Fn(ObjectId) -> Option<ObjectId>,
{
    match object {
        Object::Reference(id) => {
            let replacement = resolve(*id).map_or(Object::Null, Object::Reference);
            *object = replacement;
        }
        Object::Array(items) => items
            .iter_mut()
            .for_each(|item| rewrite_references(item, resolve)),
        Object::Dictionary(dictionary) => dictionary
            .iter_mut()
            .for_each(|(_, value)| rewrite_references(value, resolve)),
        Object::Stream(stream) => stream
            .dict
            .iter_mut()
            .for_each(|(_, value)| rewrite_references(value, resolve)),
        _ => {}
    }
}
