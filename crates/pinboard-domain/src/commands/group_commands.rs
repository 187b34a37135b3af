use async_trait::async_trait;
use pinboard_core::{PinboardResult, Point, Rect};

use super::Command;
use crate::{
    repository::Repositories, snapshot::restore_connections, Connection, Endpoint, Group,
    GroupId, GroupUpdate, PlacementId, PlacementUpdate,
};

/// Create a group on a tab.
///
/// Idempotent: `apply` is a no-op when the group row already exists.
/// Undo detaches any members and connections before removing the group.
pub struct CreateGroup {
    pub group: Group,
}

#[async_trait]
impl Command for CreateGroup {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        if repos.groups.exists(self.group.id).await? {
            return Ok(());
        }
        if !repos.tabs.exists(self.group.tab_id).await? {
            tracing::warn!(tab_id = %self.group.tab_id, "tab gone, not creating group");
            return Ok(());
        }
        repos.groups.put(&self.group).await
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        detach_group(repos, self.group.id).await?;
        repos.groups.delete(self.group.id).await
    }

    fn description(&self) -> String {
        format!("Create group: '{}'", self.group.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberMove {
    pub placement_id: PlacementId,
    pub from: Point,
    pub to: Point,
}

/// Move a group and every member placement by the same delta, as one unit
pub struct MoveGroup {
    pub group_id: GroupId,
    pub from: Point,
    pub to: Point,
    pub members: Vec<MemberMove>,
}

impl MoveGroup {
    async fn move_all(&self, repos: &Repositories, forward: bool) -> PinboardResult<()> {
        let target = if forward { self.to } else { self.from };
        let Some(group) = repos.groups.get(self.group_id).await? else {
            return Ok(());
        };
        repos
            .groups
            .update(self.group_id, GroupUpdate::bounds(group.bounds().with_origin(target)))
            .await?;
        for member in &self.members {
            let position = if forward { member.to } else { member.from };
            repos
                .placements
                .update(member.placement_id, PlacementUpdate::position(position))
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Command for MoveGroup {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        self.move_all(repos, true).await
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        self.move_all(repos, false).await
    }

    fn description(&self) -> String {
        format!("Move group with {} card(s)", self.members.len())
    }
}

/// Change a group's bounds
pub struct ResizeGroup {
    pub group_id: GroupId,
    pub from: Rect,
    pub to: Rect,
}

#[async_trait]
impl Command for ResizeGroup {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        repos
            .groups
            .update(self.group_id, GroupUpdate::bounds(self.to))
            .await?;
        Ok(())
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        repos
            .groups
            .update(self.group_id, GroupUpdate::bounds(self.from))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Resize group to {:.0}x{:.0}", self.to.width, self.to.height)
    }
}

pub struct RenameGroup {
    pub group_id: GroupId,
    pub old_label: String,
    pub new_label: String,
}

#[async_trait]
impl Command for RenameGroup {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        repos
            .groups
            .update(self.group_id, GroupUpdate::label(self.new_label.clone()))
            .await?;
        Ok(())
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        repos
            .groups
            .update(self.group_id, GroupUpdate::label(self.old_label.clone()))
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Rename group to '{}'", self.new_label)
    }
}

/// Delete a group. Members stay on the tab with their `group_id` cleared;
/// connections anchored to the group are deleted.
pub struct DeleteGroup {
    pub group: Group,
    pub members: Vec<PlacementId>,
    pub connections: Vec<Connection>,
}

impl DeleteGroup {
    pub async fn capture(repos: &Repositories, group_id: GroupId) -> PinboardResult<Option<Self>> {
        let Some(group) = repos.groups.get(group_id).await? else {
            return Ok(None);
        };
        let members = repos
            .placements
            .by_group(group_id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        let connections = repos
            .connections
            .attached_to(Endpoint::group(group_id))
            .await?;
        Ok(Some(Self {
            group,
            members,
            connections,
        }))
    }
}

#[async_trait]
impl Command for DeleteGroup {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        detach_group(repos, self.group.id).await?;
        repos.groups.delete(self.group.id).await
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        if !repos.tabs.exists(self.group.tab_id).await? {
            tracing::warn!(group_id = %self.group.id, "tab gone, not restoring group");
            return Ok(());
        }
        repos.groups.put(&self.group).await?;
        for placement_id in &self.members {
            repos
                .placements
                .update(*placement_id, PlacementUpdate::group(Some(self.group.id)))
                .await?;
        }
        restore_connections(repos, &self.connections).await
    }

    fn description(&self) -> String {
        format!("Delete group: '{}'", self.group.label)
    }
}

/// Clear membership of every placement in the group and delete the
/// connections anchored to it.
async fn detach_group(repos: &Repositories, group_id: GroupId) -> PinboardResult<()> {
    for placement in repos.placements.by_group(group_id).await? {
        repos
            .placements
            .update(placement.id, PlacementUpdate::group(None))
            .await?;
    }
    for conn in repos
        .connections
        .attached_to(Endpoint::group(group_id))
        .await?
    {
        repos.connections.delete(conn.id).await?;
    }
    Ok(())
}
