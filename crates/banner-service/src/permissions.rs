//! Team permission model
//!
//! Static role-to-permission table plus workspace membership lookups.
//! Every banner write path is gated through [`TeamDirectory::check`].

use std::fmt::{self, Display, Formatter};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::ids::{UserId, WorkspaceId};

/// Role of a member within one workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Owner,
    Admin,
    Editor,
    Viewer,
}

impl TeamRole {
    /// All roles, most privileged first
    pub const ALL: [Self; 4] = [Self::Owner, Self::Admin, Self::Editor, Self::Viewer];

    /// Privilege rank; higher outranks lower
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Admin => 2,
            Self::Editor => 1,
            Self::Viewer => 0,
        }
    }

    /// Whether this role grants `permission`
    #[inline]
    #[must_use]
    pub fn allows(self, permission: Permission) -> bool {
        role_permissions(self).contains(&permission)
    }
}

impl Display for TeamRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        })
    }
}

/// Action a member may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewBanners,
    EditBanners,
    PublishBanners,
    DeleteBanners,
    ViewAnalytics,
    ManageMembers,
    ManageBilling,
    DeleteWorkspace,
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ViewBanners => "view banners",
            Self::EditBanners => "edit banners",
            Self::PublishBanners => "publish banners",
            Self::DeleteBanners => "delete banners",
            Self::ViewAnalytics => "view analytics",
            Self::ManageMembers => "manage members",
            Self::ManageBilling => "manage billing",
            Self::DeleteWorkspace => "delete workspace",
        })
    }
}

const OWNER: &[Permission] = &[
    Permission::ViewBanners,
    Permission::EditBanners,
    Permission::PublishBanners,
    Permission::DeleteBanners,
    Permission::ViewAnalytics,
    Permission::ManageMembers,
    Permission::ManageBilling,
    Permission::DeleteWorkspace,
];

const ADMIN: &[Permission] = &[
    Permission::ViewBanners,
    Permission::EditBanners,
    Permission::PublishBanners,
    Permission::DeleteBanners,
    Permission::ViewAnalytics,
    Permission::ManageMembers,
];

const EDITOR: &[Permission] = &[
    Permission::ViewBanners,
    Permission::EditBanners,
    Permission::PublishBanners,
    Permission::ViewAnalytics,
];

const VIEWER: &[Permission] = &[Permission::ViewBanners, Permission::ViewAnalytics];

/// Permissions granted to `role`
#[must_use]
pub fn role_permissions(role: TeamRole) -> &'static [Permission] {
    match role {
        TeamRole::Owner => OWNER,
        TeamRole::Admin => ADMIN,
        TeamRole::Editor => EDITOR,
        TeamRole::Viewer => VIEWER,
    }
}

/// Whether a member with `assigner` may give someone the `target` role
///
/// Owners assign any role; admins assign roles below admin; nobody else
/// assigns roles.
#[must_use]
pub fn can_assign_role(assigner: TeamRole, target: TeamRole) -> bool {
    match assigner {
        TeamRole::Owner => true,
        TeamRole::Admin => target.rank() < TeamRole::Admin.rank(),
        TeamRole::Editor | TeamRole::Viewer => false,
    }
}

/// One user's role in one workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub workspace: WorkspaceId,
    pub user: UserId,
    pub role: TeamRole,
}

/// Permission check failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// User has no role in the workspace
    #[error("user {user} is not a member of workspace {workspace}")]
    NotAMember { user: UserId, workspace: WorkspaceId },

    /// User's role does not grant the permission
    #[error("role {role} may not {permission}")]
    Forbidden { role: TeamRole, permission: Permission },

    /// User may not hand out this role
    #[error("role {assigner} may not assign role {target}")]
    CannotAssign { assigner: TeamRole, target: TeamRole },
}

/// Workspace memberships
#[derive(Debug, Default)]
pub struct TeamDirectory {
    members: DashMap<(WorkspaceId, UserId), TeamRole>,
}

impl TeamDirectory {
    /// Create empty directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a membership without checks
    ///
    /// Used when a workspace is created and for seeding.
    pub fn insert(&self, membership: Membership) {
        self.members
            .insert((membership.workspace, membership.user), membership.role);
    }

    /// Remove a membership, returning the role it had
    pub fn remove(&self, workspace: WorkspaceId, user: UserId) -> Option<TeamRole> {
        self.members.remove(&(workspace, user)).map(|(_, role)| role)
    }

    /// Role of `user` in `workspace`
    #[must_use]
    pub fn role_of(&self, user: UserId, workspace: WorkspaceId) -> Option<TeamRole> {
        self.members.get(&(workspace, user)).map(|entry| *entry.value())
    }

    /// All members of `workspace`
    #[must_use]
    pub fn members(&self, workspace: WorkspaceId) -> Vec<Membership> {
        self.members
            .iter()
            .filter(|entry| entry.key().0 == workspace)
            .map(|entry| Membership {
                workspace,
                user: entry.key().1,
                role: *entry.value(),
            })
            .collect()
    }

    /// Require that `user` holds `permission` in `workspace`
    ///
    /// # Errors
    /// - `PermissionError::NotAMember` if the user has no role there
    /// - `PermissionError::Forbidden` if the role lacks the permission
    pub fn check(
        &self,
        user: UserId,
        workspace: WorkspaceId,
        permission: Permission,
    ) -> Result<TeamRole, PermissionError> {
        let role = self
            .role_of(user, workspace)
            .ok_or(PermissionError::NotAMember { user, workspace })?;

        if role.allows(permission) {
            Ok(role)
        } else {
            Err(PermissionError::Forbidden { role, permission })
        }
    }

    /// Give `member` the `role` on behalf of `actor`
    ///
    /// # Errors
    /// Returns error if `actor` cannot manage members or cannot hand out
    /// `role`
    pub fn assign_role(
        &self,
        actor: UserId,
        workspace: WorkspaceId,
        member: UserId,
        role: TeamRole,
    ) -> Result<(), PermissionError> {
        let assigner = self.check(actor, workspace, Permission::ManageMembers)?;
        if !can_assign_role(assigner, role) {
            return Err(PermissionError::CannotAssign {
                assigner,
                target: role,
            });
        }

        tracing::info!("Assigning role {} to {} in workspace {}", role, member, workspace);
        self.insert(Membership {
            workspace,
            user: member,
            role,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_has_everything() {
        for permission in OWNER {
            assert!(TeamRole::Owner.allows(*permission));
        }
        assert_eq!(role_permissions(TeamRole::Owner).len(), 8);
    }

    #[test]
    fn admin_lacks_billing_and_workspace_deletion() {
        assert!(TeamRole::Admin.allows(Permission::ManageMembers));
        assert!(TeamRole::Admin.allows(Permission::DeleteBanners));
        assert!(!TeamRole::Admin.allows(Permission::ManageBilling));
        assert!(!TeamRole::Admin.allows(Permission::DeleteWorkspace));
    }

    #[test]
    fn editor_and_viewer() {
        assert!(TeamRole::Editor.allows(Permission::PublishBanners));
        assert!(!TeamRole::Editor.allows(Permission::DeleteBanners));
        assert!(!TeamRole::Editor.allows(Permission::ManageMembers));

        assert_eq!(
            role_permissions(TeamRole::Viewer),
            &[Permission::ViewBanners, Permission::ViewAnalytics]
        );
        assert!(!TeamRole::Viewer.allows(Permission::EditBanners));
    }

    #[test]
    fn permissions_shrink_with_rank() {
        for pair in TeamRole::ALL.windows(2) {
            let (higher, lower) = (pair[0], pair[1]);
            assert!(higher.rank() > lower.rank());
            for permission in role_permissions(lower) {
                assert!(higher.allows(*permission), "{higher} should allow {permission}");
            }
        }
    }

    #[test]
    fn role_assignment_rules() {
        for target in TeamRole::ALL {
            assert!(can_assign_role(TeamRole::Owner, target));
            assert!(!can_assign_role(TeamRole::Editor, target));
            assert!(!can_assign_role(TeamRole::Viewer, target));
        }
        assert!(!can_assign_role(TeamRole::Admin, TeamRole::Owner));
        assert!(!can_assign_role(TeamRole::Admin, TeamRole::Admin));
        assert!(can_assign_role(TeamRole::Admin, TeamRole::Editor));
        assert!(can_assign_role(TeamRole::Admin, TeamRole::Viewer));
    }

    #[test]
    fn directory_check() {
        let directory = TeamDirectory::new();
        let workspace = WorkspaceId::new();
        let (editor, viewer, stranger) = (UserId::new(), UserId::new(), UserId::new());
        directory.insert(Membership { workspace, user: editor, role: TeamRole::Editor });
        directory.insert(Membership { workspace, user: viewer, role: TeamRole::Viewer });

        assert_eq!(
            directory.check(editor, workspace, Permission::EditBanners),
            Ok(TeamRole::Editor)
        );
        assert_eq!(
            directory.check(viewer, workspace, Permission::EditBanners),
            Err(PermissionError::Forbidden {
                role: TeamRole::Viewer,
                permission: Permission::EditBanners
            })
        );
        assert!(matches!(
            directory.check(stranger, workspace, Permission::ViewBanners),
            Err(PermissionError::NotAMember { .. })
        ));
        assert!(matches!(
            directory.check(editor, WorkspaceId::new(), Permission::ViewBanners),
            Err(PermissionError::NotAMember { .. })
        ));
        assert_eq!(directory.members(workspace).len(), 2);
    }

    #[test]
    fn assign_role_enforces_hierarchy() {
        let directory = TeamDirectory::new();
        let workspace = WorkspaceId::new();
        let (admin, editor, newcomer) = (UserId::new(), UserId::new(), UserId::new());
        directory.insert(Membership { workspace, user: admin, role: TeamRole::Admin });
        directory.insert(Membership { workspace, user: editor, role: TeamRole::Editor });

        directory
            .assign_role(admin, workspace, newcomer, TeamRole::Editor)
            .unwrap();
        assert_eq!(directory.role_of(newcomer, workspace), Some(TeamRole::Editor));

        assert_eq!(
            directory.assign_role(admin, workspace, newcomer, TeamRole::Owner),
            Err(PermissionError::CannotAssign {
                assigner: TeamRole::Admin,
                target: TeamRole::Owner
            })
        );
        assert!(matches!(
            directory.assign_role(editor, workspace, newcomer, TeamRole::Viewer),
            Err(PermissionError::Forbidden { .. })
        ));

        assert_eq!(directory.remove(workspace, newcomer), Some(TeamRole::Editor));
        assert_eq!(directory.role_of(newcomer, workspace), None);
    }
}
