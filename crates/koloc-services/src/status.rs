use koloc_core::Entry;

use crate::batch_count;

/// Translation progress of one catalog. The header is not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub total: usize,
    pub translated: usize,
    pub fuzzy: usize,
    pub verified: usize,
    pub empty: usize,
}

impl Status {
    /// Batches needed to hand out every non-verified entry.
    pub fn pending_batches(&self, batch_size: usize) -> usize {
        batch_count(self.total - self.verified, batch_size)
    }

    /// Verified share in percent, 0 for an empty catalog.
    pub fn verified_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.verified as f64 * 100.0 / self.total as f64
        }
    }
}

pub fn status(entries: &[Entry]) -> Status {
    let mut s = Status::default();
    for e in entries.iter().filter(|e| !e.is_header && e.has_id()) {
        s.total += 1;
        if e.is_translated() {
            s.translated += 1;
        } else {
            s.empty += 1;
        }
        if e.is_fuzzy() {
            s.fuzzy += 1;
        }
        if e.is_verified() {
            s.verified += 1;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_state() {
        let mut fuzzy = Entry::new("Save", "Sauve");
        fuzzy.set_fuzzy(true);
        let mut fuzzy_empty = Entry::new("Quit", "");
        fuzzy_empty.set_fuzzy(true);
        let entries = vec![
            Entry {
                is_header: true,
                msgstr: "Language: fr\n".into(),
                ..Default::default()
            },
            Entry::new("Cancel", "Annuler"),
            fuzzy,
            fuzzy_empty,
            Entry::new("Load", ""),
        ];
        let s = status(&entries);
        assert_eq!(
            s,
            Status {
                total: 4,
                translated: 2,
                fuzzy: 2,
                verified: 1,
                empty: 2,
            }
        );
        assert_eq!(s.pending_batches(2), 2);
        assert_eq!(s.verified_percent(), 25.0);
    }

    #[test]
    fn empty_catalog() {
        let s = status(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.pending_batches(100), 0);
        assert_eq!(s.verified_percent(), 0.0);
    }
}
