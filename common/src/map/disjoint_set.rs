use std::collections::HashMap;

use disjoint::DisjointSet as IndexSet;

use crate::{error::MapError, map::maker::Cell};

/// Union-find over grid cells.
///
/// `disjoint` does the index bookkeeping (with path compression, so lookups
/// never recurse); this wrapper maps cells onto indices and reports cells it
/// was never given.
pub struct DisjointSet {
    elements: Vec<Cell>,
    index_of: HashMap<Cell, usize>,
    set: IndexSet,
}

impl DisjointSet {
    pub fn new(elements: impl IntoIterator<Item = Cell>) -> Self {
        let mut index_of = HashMap::new();
        let mut unique = Vec::new();

        for element in elements {
            index_of.entry(element).or_insert_with(|| {
                unique.push(element);
                unique.len() - 1
            });
        }

        let set = IndexSet::with_len(unique.len());
        Self {
            elements: unique,
            index_of,
            set,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Representative of the component holding `element`.
    pub fn find(&mut self, element: Cell) -> Result<Cell, MapError> {
        let index = self.index(element)?;
        let root = self.set.root_of(index);
        Ok(self.elements[root])
    }

    /// Merges the components of `a` and `b`. Returns `false` if they already
    /// shared one.
    pub fn union(&mut self, a: Cell, b: Cell) -> Result<bool, MapError> {
        let i = self.index(a)?;
        let j = self.index(b)?;
        if self.set.root_of(i) == self.set.root_of(j) {
            return Ok(false);
        }
        self.set.join(i, j);
        Ok(true)
    }

    pub fn same_component(&mut self, a: Cell, b: Cell) -> Result<bool, MapError> {
        Ok(self.find(a)? == self.find(b)?)
    }

    fn index(&self, element: Cell) -> Result<usize, MapError> {
        self.index_of
            .get(&element)
            .copied()
            .ok_or_else(|| MapError::UnknownElement(element))
    }
}
