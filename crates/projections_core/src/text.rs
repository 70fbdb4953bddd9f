//! Interned names.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;

/// Handle of a name stored in an [`Interner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Text(u32);

/// Name table shared by every document of one compilation.
///
/// The same type name always maps to the same [`Text`], whichever file it was
/// read from, so definitions can be compared across documents.
#[derive(Debug, Default)]
pub struct Interner {
    names: RefCell<IndexSet<Box<str>, FxBuildHasher>>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, name: &str) -> Text {
        let mut names = self.names.borrow_mut();
        let index = match names.get_index_of(name) {
            Some(index) => index,
            None => names.insert_full(name.into()).0,
        };
        Text(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Returns the name behind a handle, or an empty string for a foreign one.
    #[must_use]
    pub fn get(&self, text: Text) -> String {
        self.names
            .borrow()
            .get_index(text.0 as usize)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Returns true if `text` is the name `name`.
    #[must_use]
    pub fn is(&self, text: Text, name: &str) -> bool {
        self.names
            .borrow()
            .get_index(text.0 as usize)
            .is_some_and(|stored| &**stored == name)
    }
}
