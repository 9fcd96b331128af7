//! Items accumulated by one result list.

/// Items fetched so far, in backend order.
///
/// `offset` is the server-side offset of the next page, i.e. the number of
/// items received so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage<T> {
    items: Vec<T>,
    offset: u64,
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self { items: Vec::new(), offset: 0 }
    }
}

impl<T> ResultPage<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn append(&mut self, items: Vec<T>) {
        self.items.extend(items);
        self.offset = self.items.len() as u64;
    }
}
