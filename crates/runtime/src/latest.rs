/// Single-slot mailbox that keeps only the most recent value.
///
/// Used to hold updates that arrive before their target is ready: every
/// update overwrites the previous one, and the ready side takes whatever is
/// there once. Nothing is lost that matters, since only the latest value is
/// ever applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestSlot<T> {
    pending: Option<T>,
    superseded: u64,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            pending: None,
            superseded: 0,
        }
    }
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, replacing any pending one.
    ///
    /// Returns `true` if a pending value was replaced.
    pub fn put(&mut self, value: T) -> bool {
        let replaced = self.pending.replace(value).is_some();
        if replaced {
            self.superseded += 1;
        }
        replaced
    }

    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// How many values were overwritten before being taken.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::LatestSlot;

    #[test]
    fn keeps_latest_value() {
        let mut slot = LatestSlot::new();
        assert!(!slot.put("berber"));
        assert!(slot.put("sharifian"));
        assert_eq!(slot.peek(), Some(&"sharifian"));
        assert_eq!(slot.superseded(), 1);
        assert_eq!(slot.take(), Some("sharifian"));
        assert!(slot.is_empty());
        assert_eq!(slot.take(), None);
    }
}
