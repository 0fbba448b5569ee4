use uuid::Uuid;

/// Source of fresh block identifiers.
pub trait IdGenerator {
    /// Produce an id not previously returned by this generator.
    fn next_id(&mut self) -> String;
}

/// Short random ids: the leading hex digits of a v4 UUID.
#[derive(Debug, Clone)]
pub struct ShortIdGenerator {
    length: usize,
}

impl ShortIdGenerator {
    pub const DEFAULT_LENGTH: usize = 10;

    /// Create a generator emitting `length` hex digits (clamped to 6..=32).
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(6, 32),
        }
    }
}

impl Default for ShortIdGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LENGTH)
    }
}

impl IdGenerator for ShortIdGenerator {
    fn next_id(&mut self) -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(self.length);
        id
    }
}

/// Deterministic ids (`prefix1`, `prefix2`, ...), used by tests and replayed scripts.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
