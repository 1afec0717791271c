//! Key ranges for ordered scans.

/// A half-open key range `[start, end)`; `end == None` means unbounded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRange {
    pub start: Vec<u8>,
    pub end: Option<Vec<u8>>,
}

impl KeyRange {
    pub fn new(start: impl Into<Vec<u8>>, end: Option<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            end,
        }
    }

    /// Every key starting with `prefix`.
    pub fn prefix(prefix: &[u8]) -> Self {
        let mut upper = prefix.to_vec();
        let end = if increment_prefix(&mut upper) {
            Some(upper)
        } else {
            None
        };
        Self {
            start: prefix.to_vec(),
            end,
        }
    }

    /// Whether `key` falls inside the range.
    pub fn contains(&self, key: &[u8]) -> bool {
        key >= self.start.as_slice()
            && match &self.end {
                Some(end) => key < end.as_slice(),
                None => true,
            }
    }

    /// The same range with its start moved to `start` (used to resume a scan).
    pub fn resume_from(&self, start: Vec<u8>) -> Self {
        Self {
            start,
            end: self.end.clone(),
        }
    }
}

/// Turn `prefix` into the smallest key greater than every key that starts
/// with it. Returns `false` when no such key exists (all bytes are `0xFF`).
pub fn increment_prefix(prefix: &mut Vec<u8>) -> bool {
    while let Some(last) = prefix.last_mut() {
        if *last < u8::MAX {
            *last += 1;
            return true;
        }
        prefix.pop();
    }
    false
}

/// The smallest key strictly greater than `key`.
pub fn successor(key: &[u8]) -> Vec<u8> {
    let mut next = key.to_vec();
    next.push(0);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_range_bounds() {
        let r = KeyRange::prefix(&[0x21, 0x01]);
        assert_eq!(r.end, Some(vec![0x21, 0x02]));
        assert!(r.contains(&[0x21, 0x01, 0xFF]));
        assert!(!r.contains(&[0x21, 0x02]));
        assert!(!r.contains(&[0x21]));
    }

    #[test]
    fn increment_prefix_carries_over_ff() {
        let mut p = vec![0x01, 0xFF];
        assert!(increment_prefix(&mut p));
        assert_eq!(p, vec![0x02]);

        let mut all_ff = vec![0xFF, 0xFF];
        assert!(!increment_prefix(&mut all_ff));
        assert_eq!(KeyRange::prefix(&[0xFF]).end, None);
    }

    #[test]
    fn successor_is_next_key() {
        assert_eq!(successor(&[1, 2]), vec![1, 2, 0]);
        assert!(successor(&[1, 2]).as_slice() > [1u8, 2].as_slice());
    }
}
