//! LockedItem: a single owned value behind read/write permission flags.
//!
//! Access without the matching permission never fails loudly. A denied
//! `read` yields `T::default()` and a denied `write` returns `false`; in both
//! cases the item raises a one-shot error flag that [`LockedItem::was_error`]
//! reports and clears, so callers can tell a denial from a stored default.

use core::cell::Cell;
use core::fmt;

/// Capability gated by a [`LockedItem`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Permission {
    Read,
    Write,
}

impl Permission {
    const ALL: [Permission; 2] = [Permission::Read, Permission::Write];

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Permission::Read => 0b01,
            Permission::Write => 0b10,
        }
    }
}

/// Set of granted [`Permission`]s.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Permissions(u8);

impl Permissions {
    #[inline]
    pub const fn empty() -> Self {
        Permissions(0)
    }

    #[inline]
    pub const fn all() -> Self {
        Permissions(Permission::Read.bit() | Permission::Write.bit())
    }

    /// `self` plus `perm`, for building sets in const context.
    #[inline]
    pub const fn with(self, perm: Permission) -> Self {
        Permissions(self.0 | perm.bit())
    }

    /// Returns `true` if `perm` was newly added.
    #[inline]
    pub fn insert(&mut self, perm: Permission) -> bool {
        let had = self.contains(perm);
        self.0 |= perm.bit();
        !had
    }

    /// Returns `true` if `perm` was present.
    #[inline]
    pub fn remove(&mut self, perm: Permission) -> bool {
        let had = self.contains(perm);
        self.0 &= !perm.bit();
        had
    }

    #[inline]
    pub const fn contains(&self, perm: Permission) -> bool {
        self.0 & perm.bit() != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl fmt::Debug for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Permission> for Permissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter().fold(Permissions::empty(), Permissions::with)
    }
}

pub struct LockedItem<T> {
    value: T,
    perms: Permissions,
    was_error: Cell<bool>,
}

impl<T: Default + Clone> LockedItem<T> {
    /// Wrap `value` with no permissions granted.
    pub fn new(value: T) -> Self {
        Self {
            value,
            perms: Permissions::empty(),
            was_error: Cell::new(false),
        }
    }

    /// Grant `perm`. Granting twice is a no-op.
    pub fn assign_permission(&mut self, perm: Permission) {
        self.perms.insert(perm);
    }

    /// Revoke `perm`. Revoking an absent permission is a no-op.
    pub fn remove_permission(&mut self, perm: Permission) {
        self.perms.remove(perm);
    }

    #[inline]
    pub fn has_permission(&self, perm: Permission) -> bool {
        self.perms.contains(perm)
    }

    #[inline]
    pub fn permissions(&self) -> Permissions {
        self.perms
    }

    /// The owned value, or `T::default()` when `Read` is not granted.
    pub fn read(&self) -> T {
        if !self.perms.contains(Permission::Read) {
            self.was_error.set(true);
            return T::default();
        }
        self.value.clone()
    }

    /// Replace the owned value. Returns `false` and leaves it unchanged when
    /// `Write` is not granted.
    pub fn write(&mut self, value: T) -> bool {
        if !self.perms.contains(Permission::Write) {
            self.was_error.set(true);
            return false;
        }
        self.value = value;
        true
    }

    /// Whether an access was denied since the last call. Clears the flag.
    pub fn was_error(&self) -> bool {
        self.was_error.replace(false)
    }

    /// Consume the item and return the owned value regardless of permissions.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for LockedItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The value is withheld: Debug must not bypass the Read gate.
        f.debug_struct("LockedItem")
            .field("perms", &self.perms)
            .field("was_error", &self.was_error.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: insert/remove are idempotent and report whether they changed the set.
    #[test]
    fn permission_set_is_idempotent() {
        let mut p = Permissions::empty();
        assert!(p.is_empty());
        assert!(p.insert(Permission::Read));
        assert!(!p.insert(Permission::Read));
        assert!(p.contains(Permission::Read));
        assert!(!p.contains(Permission::Write));
        assert!(p.remove(Permission::Read));
        assert!(!p.remove(Permission::Read));
        assert!(p.is_empty());
    }

    #[test]
    fn permission_set_builders_agree() {
        let built = Permissions::empty()
            .with(Permission::Write)
            .with(Permission::Read);
        let collected: Permissions = [Permission::Read, Permission::Write].into_iter().collect();
        assert_eq!(built, Permissions::all());
        assert_eq!(collected, Permissions::all());
        assert_eq!(
            built.iter().collect::<Vec<_>>(),
            vec![Permission::Read, Permission::Write]
        );
        assert_eq!(format!("{:?}", Permissions::all()), "{Read, Write}");
    }

    /// Invariant: read without permission yields the default, then the value once granted.
    #[test]
    fn read_gated_by_permission() {
        let mut item = LockedItem::new(29);
        assert_eq!(item.read(), 0);
        item.assign_permission(Permission::Read);
        assert_eq!(item.read(), 29);
        item.remove_permission(Permission::Read);
        assert_eq!(item.read(), 0);
    }

    /// Invariant: write without permission returns false and leaves the value unchanged.
    #[test]
    fn write_gated_by_permission() {
        let mut item = LockedItem::new(String::from("old"));
        item.assign_permission(Permission::Read);
        assert!(!item.write("new".to_string()));
        assert_eq!(item.read(), "old");

        item.assign_permission(Permission::Write);
        assert!(item.write("new".to_string()));
        assert_eq!(item.read(), "new");
    }

    /// Invariant: permissions are independent of each other.
    #[test]
    fn permissions_are_independent() {
        let mut item = LockedItem::new(1u8);
        item.assign_permission(Permission::Write);
        assert!(item.has_permission(Permission::Write));
        assert!(!item.has_permission(Permission::Read));
        item.remove_permission(Permission::Read);
        assert!(item.has_permission(Permission::Write));
        assert_eq!(item.permissions(), Permissions::empty().with(Permission::Write));
    }

    /// Invariant: denials raise the error flag; `was_error` reports it once.
    #[test]
    fn was_error_is_one_shot() {
        let mut item = LockedItem::new(5i64);
        assert!(!item.was_error());

        let _ = item.read();
        assert!(item.was_error());
        assert!(!item.was_error());

        assert!(!item.write(6));
        assert!(item.was_error());
        assert!(!item.was_error());

        item.assign_permission(Permission::Read);
        item.assign_permission(Permission::Write);
        assert!(item.write(7));
        assert_eq!(item.read(), 7);
        assert!(!item.was_error());
    }

    #[test]
    fn into_inner_ignores_permissions() {
        let item = LockedItem::new(vec![1, 2, 3]);
        assert_eq!(item.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn debug_does_not_leak_value() {
        let mut item = LockedItem::new(String::from("secret"));
        item.assign_permission(Permission::Read);
        let s = format!("{:?}", item);
        assert!(!s.contains("secret"), "{s}");
        assert!(s.contains("Read"), "{s}");
    }
}
