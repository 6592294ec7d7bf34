/// Last computed value together with the inputs it was computed from.
///
/// Widgets keep one of these in their state to skip recomputing a view when their props and
/// ambient values compare equal to the previous draw.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    computations: usize,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entry: None,
            computations: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Create an empty memo
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it only if the key changed
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> &V {
        let entry = match self.entry.take() {
            Some((cached, value)) if cached == key => (cached, value),
            _ => {
                self.computations += 1;
                let value = compute(&key);
                (key, value)
            },
        };

        &self.entry.insert(entry).1
    }

    /// The cached value, if any
    pub fn get(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    /// How many times a value has been computed
    pub fn computations(&self) -> usize {
        self.computations
    }

    /// Drop the cached value
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
