use std::fmt;
use std::sync::Arc;

use super::Middleware;

/// Ordered list of middleware, outermost first.
///
/// Registration order is execution order: the first entry runs first on the
/// way in and last on the way out. Entries are shared `Arc`s, so cloning a
/// chain is cheap and never duplicates middleware state.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one middleware at the innermost position. No deduplication is done.
    pub fn append(&mut self, middleware: Arc<dyn Middleware>) {
        self.layers.push(middleware);
    }

    /// Append every entry of `other`, keeping its order.
    pub fn extend(&mut self, other: &MiddlewareChain) {
        self.layers.extend(other.layers.iter().map(Arc::clone));
    }

    /// Entries, outermost first.
    #[must_use]
    pub fn list(&self) -> &[Arc<dyn Middleware>] {
        &self.layers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Middleware>> {
        self.layers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Diagnostic names, outermost first.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|m| m.name()).collect()
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
