//! Role permission matrix.
//!
//! Every role carries a [`PermissionTree`]: resource → action → allowed.
//! Roles in one [`RoleMatrix`] must share the same resource/action keys
//! (structural parity); this is checked when the matrix is built.
//!
//! Edits never mutate in place. [`set_permission`] returns a new collection
//! in which only the touched role and the touched resource's action set are
//! new allocations; everything else is shared through `Arc`.
//!
//! The matrix is a display model. Nothing in Classdeck consults it to allow
//! or deny an action.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Action name → allowed.
pub type ActionSet = BTreeMap<String, bool>;

/// Resource name → action set. Action sets are shared between versions of a
/// tree until one of their leaves changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTree(BTreeMap<String, Arc<ActionSet>>);

impl PermissionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a whole resource.
    pub fn with_resource<'a>(
        mut self,
        resource: impl Into<String>,
        actions: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> Self {
        let set: ActionSet = actions
            .into_iter()
            .map(|(action, allowed)| (action.to_string(), allowed))
            .collect();
        self.0.insert(resource.into(), Arc::new(set));
        self
    }

    /// Value of one leaf, `None` if the resource or action is unknown.
    pub fn get(&self, resource: &str, action: &str) -> Option<bool> {
        self.0.get(resource)?.get(action).copied()
    }

    /// Whether the leaf is present and set.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.get(resource, action).unwrap_or(false)
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn actions(&self, resource: &str) -> impl Iterator<Item = &str> {
        self.0
            .get(resource)
            .into_iter()
            .flat_map(|set| set.keys().map(String::as_str))
    }

    /// Shared handle to one resource's action set.
    pub fn resource(&self, resource: &str) -> Option<&Arc<ActionSet>> {
        self.0.get(resource)
    }

    /// The set of `resource.action` keys, ignoring values.
    pub fn shape(&self) -> BTreeSet<String> {
        self.0
            .iter()
            .flat_map(|(resource, set)| set.keys().map(move |action| format!("{resource}.{action}")))
            .collect()
    }

    /// A copy with one existing leaf replaced. Untouched resources are
    /// shared with `self`. Returns `None` for an unknown leaf.
    pub fn with_leaf(&self, resource: &str, action: &str, value: bool) -> Option<Self> {
        let current = self.0.get(resource)?;
        if !current.contains_key(action) {
            return None;
        }
        let mut set = ActionSet::clone(current);
        set.insert(action.to_string(), value);

        let mut tree = self.0.clone();
        tree.insert(resource.to_string(), Arc::new(set));
        Some(Self(tree))
    }
}

/// A role and its permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub users_count: u32,
    pub permissions: PermissionTree,
}

/// Errors raised when building a [`RoleMatrix`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PermissionError {
    /// A role's resource/action keys differ from the first role's.
    #[error("role '{role}' breaks permission parity: missing {missing:?}, unexpected {unexpected:?}")]
    ParityMismatch {
        role: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Two roles share an id.
    #[error("duplicate role id: {0}")]
    DuplicateRole(String),
}

/// Flip one `(role, resource, action)` leaf.
///
/// Returns a new collection. Every role other than `role_id` is the same
/// `Arc` as in `roles`. An unknown role, resource or action leaves the
/// collection unchanged.
pub fn set_permission(
    roles: &[Arc<Role>],
    role_id: &str,
    resource: &str,
    action: &str,
    value: bool,
) -> Vec<Arc<Role>> {
    roles
        .iter()
        .map(|role| {
            if role.id != role_id {
                return Arc::clone(role);
            }
            match role.permissions.with_leaf(resource, action, value) {
                Some(permissions) => Arc::new(Role {
                    permissions,
                    ..Role::clone(role)
                }),
                None => {
                    tracing::debug!(role_id, resource, action, "ignoring edit of unknown permission");
                    Arc::clone(role)
                }
            }
        })
        .collect()
}

/// A validated, immutable collection of roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleMatrix {
    roles: Vec<Arc<Role>>,
}

impl RoleMatrix {
    /// Build a matrix, checking id uniqueness and structural parity.
    pub fn new(roles: Vec<Role>) -> Result<Self, PermissionError> {
        let mut ids = HashSet::new();
        for role in &roles {
            if !ids.insert(role.id.as_str()) {
                return Err(PermissionError::DuplicateRole(role.id.clone()));
            }
        }

        if let Some((first, rest)) = roles.split_first() {
            let expected = first.permissions.shape();
            for role in rest {
                let found = role.permissions.shape();
                if found != expected {
                    return Err(PermissionError::ParityMismatch {
                        role: role.id.clone(),
                        missing: expected.difference(&found).cloned().collect(),
                        unexpected: found.difference(&expected).cloned().collect(),
                    });
                }
            }
        }

        Ok(Self {
            roles: roles.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn roles(&self) -> &[Arc<Role>] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn get(&self, role_id: &str) -> Option<&Arc<Role>> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    /// See [`set_permission`]. Parity is preserved because only existing
    /// leaves can change.
    pub fn set_permission(&self, role_id: &str, resource: &str, action: &str, value: bool) -> Self {
        Self {
            roles: set_permission(&self.roles, role_id, resource, action, value),
        }
    }

    /// Resources shared by every role, in key order.
    pub fn resources(&self) -> Vec<&str> {
        self.roles
            .first()
            .map(|r| r.permissions.resources().collect())
            .unwrap_or_default()
    }

    /// Actions of `resource`, in key order.
    pub fn actions(&self, resource: &str) -> Vec<&str> {
        self.roles
            .first()
            .map(|r| r.permissions.actions(resource).collect())
            .unwrap_or_default()
    }

    /// Whether any role grants `resource.action`.
    pub fn any_grants(&self, resource: &str, action: &str) -> bool {
        self.roles.iter().any(|r| r.permissions.allows(resource, action))
    }

    /// Arrange the matrix into display sections following `layout`.
    ///
    /// Resources missing from the layout are appended in key order with all
    /// of their actions. Optional actions are shown only while some role
    /// grants them.
    pub fn sections(&self, layout: &MatrixLayout) -> Vec<MatrixSection> {
        let resources = self.resources();
        let mut ordered: Vec<(String, Vec<String>, Vec<String>)> = layout
            .sections
            .iter()
            .filter(|s| resources.contains(&s.resource.as_str()))
            .map(|s| (s.resource.clone(), s.actions.clone(), s.optional.clone()))
            .collect();
        for resource in &resources {
            if !layout.sections.iter().any(|s| s.resource == *resource) {
                let actions = self.actions(resource).into_iter().map(str::to_string).collect();
                ordered.push((resource.to_string(), actions, Vec::new()));
            }
        }

        ordered
            .into_iter()
            .map(|(resource, actions, optional)| {
                let known = self.actions(&resource);
                let rows = actions
                    .iter()
                    .filter(|action| known.contains(&action.as_str()))
                    .filter(|action| !optional.contains(action) || self.any_grants(&resource, action))
                    .map(|action| MatrixRow {
                        action: action.clone(),
                        cells: self
                            .roles
                            .iter()
                            .map(|role| MatrixCell {
                                role_id: role.id.clone(),
                                role_name: role.name.clone(),
                                granted: role.permissions.allows(&resource, action),
                            })
                            .collect(),
                    })
                    .collect();
                MatrixSection { resource, rows }
            })
            .collect()
    }
}

/// Display order of the permissions matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixLayout {
    pub sections: Vec<SectionLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub resource: String,
    pub actions: Vec<String>,
    /// Actions shown only while at least one role grants them.
    #[serde(default)]
    pub optional: Vec<String>,
}

impl SectionLayout {
    fn new(resource: &str, actions: &[&str], optional: &[&str]) -> Self {
        Self {
            resource: resource.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
            optional: optional.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Default for MatrixLayout {
    fn default() -> Self {
        const CRUD: &[&str] = &["create", "read", "update", "delete"];
        Self {
            sections: vec![
                SectionLayout::new("courses", CRUD, &[]),
                SectionLayout::new("lessons", CRUD, &[]),
                SectionLayout::new("tasks", CRUD, &[]),
                SectionLayout::new("users", CRUD, &[]),
                SectionLayout::new("reviews", CRUD, &["create", "delete"]),
                SectionLayout::new("statistics", &["read"], &[]),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixSection {
    pub resource: String,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub action: String,
    pub cells: Vec<MatrixCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixCell {
    pub role_id: String,
    pub role_name: String,
    pub granted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn matrix() -> RoleMatrix {
        RoleMatrix::new(seed::roles()).unwrap()
    }

    #[test]
    fn flips_one_leaf_and_shares_everything_else() {
        let before = matrix();
        assert_eq!(before.get("r3").unwrap().permissions.get("courses", "update"), Some(false));

        let after = before.set_permission("r3", "courses", "update", true);

        let r3 = after.get("r3").unwrap();
        assert_eq!(r3.permissions.get("courses", "update"), Some(true));
        assert!(!Arc::ptr_eq(r3, before.get("r3").unwrap()));

        for (old, new) in before.roles().iter().zip(after.roles()) {
            if old.id != "r3" {
                assert!(Arc::ptr_eq(old, new), "role {} was copied", old.id);
            }
        }

        let old_tree = &before.get("r3").unwrap().permissions;
        for resource in old_tree.resources() {
            let shared = Arc::ptr_eq(
                old_tree.resource(resource).unwrap(),
                r3.permissions.resource(resource).unwrap(),
            );
            assert_eq!(shared, resource != "courses", "resource {resource}");
        }

        // the original collection is untouched
        assert_eq!(before.get("r3").unwrap().permissions.get("courses", "update"), Some(false));
    }

    #[test]
    fn overwrite_is_idempotent() {
        let once = matrix().set_permission("r2", "users", "delete", true);
        let twice = once.set_permission("r2", "users", "delete", true);
        assert_eq!(once, twice);
        assert_eq!(twice.get("r2").unwrap().permissions.get("users", "delete"), Some(true));
        for (a, b) in once.roles().iter().zip(twice.roles()) {
            if a.id != "r2" {
                assert!(Arc::ptr_eq(a, b));
            }
        }
    }

    #[test]
    fn unknown_targets_are_noops() {
        let before = matrix();
        for after in [
            before.set_permission("r404", "courses", "read", false),
            before.set_permission("r1", "billing", "read", false),
            before.set_permission("r1", "statistics", "delete", true),
        ] {
            assert_eq!(after.len(), before.len());
            for (a, b) in before.roles().iter().zip(after.roles()) {
                assert!(Arc::ptr_eq(a, b));
            }
        }
    }

    #[test]
    fn parity_violation_is_reported() {
        let mut roles = seed::roles();
        roles[2].permissions = roles[2]
            .permissions
            .clone()
            .with_resource("statistics", [("read", true), ("export", false)]);

        let err = RoleMatrix::new(roles).unwrap_err();
        assert_eq!(
            err,
            PermissionError::ParityMismatch {
                role: "r3".to_string(),
                missing: vec![],
                unexpected: vec!["statistics.export".to_string()],
            }
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut roles = seed::roles();
        roles[1].id = "r1".to_string();
        assert_eq!(
            RoleMatrix::new(roles).unwrap_err(),
            PermissionError::DuplicateRole("r1".to_string())
        );
    }

    #[test]
    fn sections_follow_layout_and_hide_ungranted_optional_actions() {
        let m = matrix();
        let sections = m.sections(&MatrixLayout::default());
        let names: Vec<_> = sections.iter().map(|s| s.resource.as_str()).collect();
        assert_eq!(names, ["courses", "lessons", "tasks", "users", "reviews", "statistics"]);

        let reviews = &sections[4];
        let actions: Vec<_> = reviews.rows.iter().map(|r| r.action.as_str()).collect();
        // seeded Admin grants reviews.create and reviews.delete
        assert_eq!(actions, ["create", "read", "update", "delete"]);

        let stats = &sections[5];
        assert_eq!(stats.rows.len(), 1);
        assert_eq!(stats.rows[0].cells.len(), 4);
        assert!(!stats.rows[0].cells[2].granted, "Student cannot read statistics");
    }

    #[test]
    fn optional_actions_disappear_when_nobody_grants_them() {
        let mut m = matrix();
        for role in ["r1", "r2", "r4"] {
            m = m.set_permission(role, "reviews", "create", false);
        }
        let sections = m.sections(&MatrixLayout::default());
        let reviews = sections.iter().find(|s| s.resource == "reviews").unwrap();
        let actions: Vec<_> = reviews.rows.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, ["read", "update", "delete"]);
    }

    #[test]
    fn resources_outside_the_layout_are_appended() {
        let roles = seed::roles()
            .into_iter()
            .map(|mut r| {
                r.permissions = r.permissions.with_resource("billing", [("read", false)]);
                r
            })
            .collect();
        let m = RoleMatrix::new(roles).unwrap();
        let sections = m.sections(&MatrixLayout::default());
        assert_eq!(sections.last().unwrap().resource, "billing");
    }

    #[test]
    fn tree_round_trips_through_yaml() {
        let role = &seed::roles()[0];
        let yaml = serde_yaml::to_string(role).unwrap();
        let back: Role = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(&back, role);
    }
}
