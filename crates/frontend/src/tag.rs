//! Struct/union tag entries.
//!
//! A tag byte (`TypeCode::Struct`/`TypeCode::Union`) carries only a
//! [`TagId`]; the aggregate's size and field table live here, out of line,
//! so a forward-declared ("incomplete") tag can be registered before its
//! body is known and then filled in once the body is parsed.

use c65_types::{TagId, TagSizeResolver};

use crate::symtab::Symbol;

#[derive(Debug)]
pub struct TagEntry {
    pub ident: Option<String>,
    /// `None` until the body is parsed; an incomplete tag has no size.
    pub size: Option<u32>,
    pub fields: Option<Vec<Symbol>>,
}

impl TagEntry {
    pub fn incomplete(ident: Option<String>) -> Self {
        TagEntry {
            ident,
            size: None,
            fields: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.size.is_some()
    }

    pub fn complete(&mut self, size: u32, fields: Vec<Symbol>) {
        self.size = Some(size);
        self.fields = Some(fields);
    }

    pub fn field(&self, ident: &str) -> Option<&Symbol> {
        self.fields
            .as_ref()?
            .iter()
            .find(|sym| sym.ident == ident)
    }
}

/// Arena of struct/union tag entries, one per distinct tag (named or
/// anonymous).
#[derive(Debug, Default)]
pub struct TagStore {
    entries: Vec<TagEntry>,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: TagEntry) -> TagId {
        let id = TagId(self.entries.len() as u32);
        self.entries.push(entry);
        id
    }

    pub fn get(&self, id: TagId) -> &TagEntry {
        &self.entries[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: TagId) -> &mut TagEntry {
        &mut self.entries[id.0 as usize]
    }
}

impl TagSizeResolver for TagStore {
    fn tag_size(&self, id: TagId) -> Option<u32> {
        self.entries[id.0 as usize].size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_declared_tag_is_incomplete() {
        let mut tags = TagStore::new();
        let id = tags.insert(TagEntry::incomplete(Some("Node".into())));
        assert!(!tags.get(id).is_complete());
        assert_eq!(tags.tag_size(id), None);

        tags.get_mut(id).complete(4, vec![]);
        assert!(tags.get(id).is_complete());
        assert_eq!(tags.tag_size(id), Some(4));
    }
}
