//! Roles

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Role Key
    pub struct RoleKey;
}

/// Errors raised while assembling a [`Roster`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// No roles were provided.
    #[error("no roles provided")]
    Empty,

    /// The same role name was declared twice.
    #[error("duplicate role name: `{0}`")]
    DuplicateRole(String),

    /// A role was declared with a zero unit count.
    #[error("role `{0}` has a zero unit count")]
    ZeroCount(String),

    /// The popularity ranking references a role that was never declared.
    #[error("popularity ranking references unknown role `{0}`")]
    UnknownPopularityRole(String),

    /// The popularity ranking lists the same role twice.
    #[error("popularity ranking lists role `{0}` more than once")]
    DuplicatePopularityRole(String),
}

/// A single merchandise role: one character/variant SKU sharing the common
/// base price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    name: String,
    count: u64,
}

impl Role {
    /// Create a role with the given unit count.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// Role name, unique within a roster.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units sold/produced at the shared base price.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Validated set of roles together with their popularity ranking.
///
/// Roles are interned in a slot map; the declaration order and the
/// most-to-least-popular order are kept as key sequences so every later
/// stage works with cheap copyable keys instead of name lookups.
#[derive(Debug, Clone)]
pub struct Roster {
    roles: SlotMap<RoleKey, Role>,
    order: Vec<RoleKey>,
    by_name: FxHashMap<String, RoleKey>,
    popularity: Vec<RoleKey>,
}

impl Roster {
    /// Intern the given roles and popularity ranking.
    ///
    /// The ranking must reference declared roles only and may cover a subset
    /// of them; roles outside the ranking simply carry no ordering
    /// constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`RosterError`] when the roles are empty, a name or ranking
    /// entry is duplicated, a count is zero, or the ranking references an
    /// undeclared role.
    pub fn new(
        roles: impl IntoIterator<Item = Role>,
        popularity: &[String],
    ) -> Result<Self, RosterError> {
        let mut interned: SlotMap<RoleKey, Role> = SlotMap::with_key();
        let mut order = Vec::new();
        let mut by_name = FxHashMap::default();

        for role in roles {
            if role.count() == 0 {
                return Err(RosterError::ZeroCount(role.name().to_string()));
            }

            if by_name.contains_key(role.name()) {
                return Err(RosterError::DuplicateRole(role.name().to_string()));
            }

            let name = role.name().to_string();
            let key = interned.insert(role);

            order.push(key);
            by_name.insert(name, key);
        }

        if order.is_empty() {
            return Err(RosterError::Empty);
        }

        let mut ranked: FxHashSet<RoleKey> = FxHashSet::default();
        let mut popularity_keys = Vec::with_capacity(popularity.len());

        for name in popularity {
            let Some(key) = by_name.get(name).copied() else {
                return Err(RosterError::UnknownPopularityRole(name.clone()));
            };

            if !ranked.insert(key) {
                return Err(RosterError::DuplicatePopularityRole(name.clone()));
            }

            popularity_keys.push(key);
        }

        Ok(Self {
            roles: interned,
            order,
            by_name,
            popularity: popularity_keys,
        })
    }

    /// Number of roles in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the roster holds no roles. Construction rejects this, so the
    /// check only matters for defaulted values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a role by key.
    #[must_use]
    pub fn get(&self, key: RoleKey) -> Option<&Role> {
        self.roles.get(key)
    }

    /// Look up a role key by name.
    #[must_use]
    pub fn key(&self, name: &str) -> Option<RoleKey> {
        self.by_name.get(name).copied()
    }

    /// Roles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (RoleKey, &Role)> {
        self.order
            .iter()
            .filter_map(|key| self.roles.get(*key).map(|role| (*key, role)))
    }

    /// Total units across all roles.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.iter().map(|(_, role)| role.count()).sum()
    }

    /// Consecutive `(higher, lower)` pairs of the popularity ranking,
    /// most popular first.
    pub fn popularity_pairs(&self) -> impl Iterator<Item = (RoleKey, RoleKey)> + '_ {
        self.popularity
            .iter()
            .copied()
            .zip(self.popularity.iter().copied().skip(1))
    }
}
