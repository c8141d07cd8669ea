//! Wheel-of-fortune entries.

use rand::Rng;

use crate::{SelectionError, pick_wheel_entry};

/// An ordered list of wheel entries.
///
/// Entries are free-form and may repeat; a repeated entry simply gets
/// more slots on the wheel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wheel {
    entries: Vec<String>,
}

impl Wheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trimmed entry. Blank input is ignored and returns `false`.
    pub fn add(&mut self, entry: &str) -> bool {
        let entry = entry.trim();
        if entry.is_empty() {
            return false;
        }
        self.entries.push(entry.to_string());
        true
    }

    /// Removes the entry at `index`, returning it, or `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Spins the wheel.
    ///
    /// # Errors
    /// [`SelectionError::Empty`] if there are no entries.
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str, SelectionError> {
        pick_wheel_entry(rng, &self.entries).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<String> for Wheel {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut wheel = Wheel::new();
        for entry in iter {
            wheel.add(&entry);
        }
        wheel
    }
}
