use std::collections::{BTreeSet, HashMap};

/// Default number of times one `$ref` may be entered during a single synthesis.
pub const DEFAULT_CYCLE_LIMIT: usize = 100;

/// Default number of references that may be expanded inside one another.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Per-call cycle tracking for mock synthesis.
///
/// Counts how often each reference has been entered. A reference entered more than
/// `limit` times stops being expanded and is recorded as exceeded. Independently,
/// expansion stops once `max_depth` references are open at the same time, which
/// bounds the nesting of long reference rings. Create a fresh context for every
/// top-level value; never share one between calls.
#[derive(Debug, Clone)]
pub struct MockContext {
    counts: HashMap<String, usize>,
    limit: usize,
    depth: usize,
    max_depth: usize,
    exceeded: BTreeSet<String>,
}

impl Default for MockContext {
    fn default() -> Self {
        Self::with_limit(DEFAULT_CYCLE_LIMIT)
    }
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            counts: HashMap::new(),
            limit,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            exceeded: BTreeSet::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Record one more entry into `reference`. Returns `false` once the limit is passed.
    pub fn enter(&mut self, reference: &str) -> bool {
        let count = self.counts.entry(reference.to_string()).or_insert(0);
        *count += 1;
        if *count > self.limit {
            self.exceeded.insert(reference.to_string());
            return false;
        }
        true
    }

    /// Open `reference` for expansion. Returns `false`, recording it as exceeded,
    /// when `max_depth` references are already open. Pair every `true` with
    /// [`MockContext::ascend`].
    pub fn descend(&mut self, reference: &str) -> bool {
        if self.depth >= self.max_depth {
            self.exceeded.insert(reference.to_string());
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// References currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn count(&self, reference: &str) -> usize {
        self.counts.get(reference).copied().unwrap_or(0)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// References that hit the limit, in sorted order.
    pub fn exceeded(&self) -> &BTreeSet<String> {
        &self.exceeded
    }

    pub fn into_exceeded(self) -> BTreeSet<String> {
        self.exceeded
    }
}
