use serde::{Deserialize, Serialize};

/// The only flag with behavior attached to it.
pub const FUZZY: &str = "fuzzy";

/// Ordered set of `#,` flags.
///
/// Insertion order is kept so a rewritten flags line lists flags the way the
/// translator (or msgmerge) wrote them, with new flags appended at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(Vec<String>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the flag was not present before.
    pub fn insert(&mut self, flag: &str) -> bool {
        if self.contains(flag) {
            return false;
        }
        self.0.push(flag.to_string());
        true
    }

    /// Returns `true` if the flag was present.
    pub fn remove(&mut self, flag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|f| f != flag);
        before != self.0.len()
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.0.iter().any(|f| f == flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Body of a `#,` comment line, e.g. `fuzzy, c-format`.
    pub fn render(&self) -> String {
        self.0.join(", ")
    }

    /// Parse the part of a `#,` line after the marker. Blank items are dropped.
    pub fn extend_from_line(&mut self, rest: &str) {
        for flag in rest.split(',') {
            let flag = flag.trim();
            if !flag.is_empty() {
                self.insert(flag);
            }
        }
    }
}

impl<'a> FromIterator<&'a str> for FlagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = FlagSet::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}
