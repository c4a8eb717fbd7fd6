//! Ordered name/value collections for query parameters and headers.

/// A single name/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// The parameter or header name
    pub name: String,
    /// The value sent on the wire
    pub value: String,
}

impl Param {
    /// Creates a new pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered collection of pairs.
///
/// Insertion order is preserved so query strings are built deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    items: Vec<Param>,
}

impl Params {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets `name` to `value`, replacing an existing entry with the exact same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let param = Param::new(name, value);
        match self.items.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => existing.value = param.value,
            None => self.items.push(param),
        }
    }

    /// Sets `name` to `value`, replacing any entry whose name matches
    /// ignoring ASCII case. Used for headers.
    pub fn set_ignore_case(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let param = Param::new(name, value);
        self.items
            .retain(|p| !p.name.eq_ignore_ascii_case(&param.name));
        self.items.push(param);
    }

    /// Returns the value for `name`, compared ignoring ASCII case.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value.as_str())
    }

    /// Returns the value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Returns an iterator over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.items.iter()
    }

    /// Returns true if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
