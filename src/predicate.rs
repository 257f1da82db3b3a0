//! Ground predicates and bit-encoded valuations.
//!
//! A predicate is an atomic fact such as `at(p2)`. Its identity is the name
//! together with the ordered argument list; the numeric id only selects the
//! bit that stores the predicate's truth value inside a [`Valuation`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Bit position of a predicate inside a valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredicateId(u32);

impl PredicateId {
    /// Returns the raw bit index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A ground predicate: name plus ordered arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predicate {
    id: PredicateId,
    name: String,
    arguments: Vec<String>,
}

impl Predicate {
    /// Bit position of this predicate.
    #[must_use]
    pub const fn id(&self) -> PredicateId {
        self.id
    }

    /// Predicate name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered ground arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    fn key(&self) -> (&str, &[String]) {
        (&self.name, &self.arguments)
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Predicate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Predicate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}({})", self.name, self.arguments.join(", "))
        }
    }
}

/// Interning table that hands out predicate ids.
///
/// Ids are dense and assigned in insertion order, so the same sequence of
/// `intern` calls always yields the same ids.
#[derive(Debug, Clone, Default)]
pub struct PredicateTable {
    by_key: BTreeMap<(String, Vec<String>), PredicateId>,
    predicates: Vec<Predicate>,
}

impl PredicateTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the predicate for `name(arguments)`, allocating an id on first use.
    pub fn intern<S: AsRef<str>>(
        &mut self,
        name: impl Into<String>,
        arguments: &[S],
    ) -> Result<Predicate, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyPredicateName);
        }
        let arguments: Vec<String> = arguments.iter().map(|a| a.as_ref().to_string()).collect();
        let key = (name, arguments);
        if let Some(id) = self.by_key.get(&key) {
            return Ok(self.predicates[id.index()].clone());
        }

        let raw = u32::try_from(self.predicates.len()).map_err(|_| {
            ValidationError::MalformedState {
                reason: "predicate table is full".to_string(),
            }
        })?;
        let id = PredicateId(raw);
        let predicate = Predicate {
            id,
            name: key.0.clone(),
            arguments: key.1.clone(),
        };
        self.by_key.insert(key, id);
        self.predicates.push(predicate.clone());
        Ok(predicate)
    }

    /// Looks up an already interned predicate.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, name: &str, arguments: &[S]) -> Option<&Predicate> {
        let key = (
            name.to_string(),
            arguments.iter().map(|a| a.as_ref().to_string()).collect::<Vec<_>>(),
        );
        self.by_key.get(&key).map(|id| &self.predicates[id.index()])
    }

    /// Returns the predicate stored under `id`.
    #[must_use]
    pub fn by_id(&self, id: PredicateId) -> Option<&Predicate> {
        self.predicates.get(id.index())
    }

    /// Iterates predicates in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }

    /// Number of interned predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Postcondition of an event: predicates forced to a truth value.
///
/// Predicates absent from the map keep their prior value.
pub type Effects = BTreeMap<Predicate, bool>;

/// Truth assignment stored as a bitset keyed by predicate id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Valuation {
    words: Vec<u64>,
}

impl Valuation {
    /// The all-false valuation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A valuation where exactly `predicates` are true.
    pub fn from_true<'a>(predicates: impl IntoIterator<Item = &'a Predicate>) -> Self {
        let mut valuation = Self::new();
        for predicate in predicates {
            valuation.set(predicate.id(), true);
        }
        valuation
    }

    /// Truth value of the predicate with id `id`.
    #[must_use]
    pub fn get(&self, id: PredicateId) -> bool {
        let (word, bit) = (id.index() / 64, id.index() % 64);
        self.words.get(word).is_some_and(|w| w & (1u64 << bit) != 0)
    }

    /// Truth value of `predicate`.
    #[must_use]
    pub fn holds(&self, predicate: &Predicate) -> bool {
        self.get(predicate.id())
    }

    /// Sets the truth value of the predicate with id `id`.
    pub fn set(&mut self, id: PredicateId, value: bool) {
        let (word, bit) = (id.index() / 64, id.index() % 64);
        if value {
            if self.words.len() <= word {
                self.words.resize(word + 1, 0);
            }
            self.words[word] |= 1u64 << bit;
        } else if let Some(w) = self.words.get_mut(word) {
            *w &= !(1u64 << bit);
        }
    }

    /// Returns a copy of this valuation with `effects` applied.
    #[must_use]
    pub fn apply(&self, effects: &Effects) -> Self {
        let mut next = self.clone();
        for (predicate, value) in effects {
            next.set(predicate.id(), *value);
        }
        next
    }

    /// Ids of the true predicates, ascending.
    pub fn true_ids(&self) -> impl Iterator<Item = PredicateId> + '_ {
        self.words.iter().enumerate().flat_map(|(w, word)| {
            (0..64u32).filter_map(move |bit| {
                if word & (1u64 << bit) == 0 {
                    return None;
                }
                u32::try_from(w * 64)
                    .ok()
                    .map(|base| PredicateId(base + bit))
            })
        })
    }
}

impl PartialEq for Valuation {
    fn eq(&self, other: &Self) -> bool {
        let len = self.words.len().max(other.words.len());
        (0..len).all(|i| {
            self.words.get(i).copied().unwrap_or(0) == other.words.get(i).copied().unwrap_or(0)
        })
    }
}

impl Eq for Valuation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_structural() {
        let mut table = PredicateTable::new();
        let a = table.intern("at", &["p1"]).unwrap();
        let b = table.intern("at", &["p1"]).unwrap();
        let c = table.intern("at", &["p2"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("at", &["p2"]).map(Predicate::id), Some(c.id()));
    }

    #[test]
    fn test_intern_rejects_empty_name() {
        let mut table = PredicateTable::new();
        assert!(table.intern("", &[] as &[&str]).is_err());
    }

    #[test]
    fn test_valuation_apply_keeps_untouched_bits() {
        let mut table = PredicateTable::new();
        let p = table.intern("p", &[] as &[&str]).unwrap();
        let q = table.intern("q", &[] as &[&str]).unwrap();
        let r = table.intern("r", &[] as &[&str]).unwrap();

        let base = Valuation::from_true([&p, &q]);
        let mut effects = Effects::new();
        effects.insert(p.clone(), false);
        effects.insert(r.clone(), true);

        let next = base.apply(&effects);
        assert!(!next.holds(&p));
        assert!(next.holds(&q));
        assert!(next.holds(&r));
        assert!(base.holds(&p));
    }

    #[test]
    fn test_valuation_equality_ignores_trailing_words() {
        let mut a = Valuation::new();
        a.set(PredicateId(130), true);
        a.set(PredicateId(130), false);
        assert_eq!(a, Valuation::new());
    }

    #[test]
    fn test_true_ids_ascending() {
        let mut v = Valuation::new();
        v.set(PredicateId(70), true);
        v.set(PredicateId(3), true);
        let ids: Vec<_> = v.true_ids().collect();
        assert_eq!(ids, vec![PredicateId(3), PredicateId(70)]);
    }
}
