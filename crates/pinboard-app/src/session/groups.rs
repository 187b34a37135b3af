use pinboard_core::{PinboardError, PinboardResult, Rect};
use pinboard_domain::canvas::gesture::{MIN_GROUP_HEIGHT, MIN_GROUP_WIDTH};
use pinboard_domain::commands::{
    CreateConnection, CreateGroup, DeleteConnection, DeleteGroup, RenameGroup, UpdateConnection,
};
use pinboard_domain::{
    ConnectionColor, ConnectionId, ConnectionUpdate, Endpoint, Group, GroupId, DEFAULT_GROUP_HEIGHT,
    DEFAULT_GROUP_LABEL, DEFAULT_GROUP_WIDTH,
};

use super::Session;

impl Session {
    /// Create a group on the current tab. Without `bounds` it is centered in
    /// the visible canvas at the default size. Given bounds are raised to the
    /// minimum group size.
    pub async fn create_group(&mut self, bounds: Option<Rect>) -> PinboardResult<GroupId> {
        let bounds = match bounds {
            Some(b) => Rect::new(
                b.x,
                b.y,
                b.width.max(MIN_GROUP_WIDTH),
                b.height.max(MIN_GROUP_HEIGHT),
            ),
            None => {
                let center = self.viewport.center(self.container);
                Rect::new(
                    center.x - DEFAULT_GROUP_WIDTH / 2.0,
                    center.y - DEFAULT_GROUP_HEIGHT / 2.0,
                    DEFAULT_GROUP_WIDTH,
                    DEFAULT_GROUP_HEIGHT,
                )
            }
        };
        let group = Group::new(self.tab.id, DEFAULT_GROUP_LABEL.to_string(), bounds);
        let group_id = group.id;
        self.run(Box::new(CreateGroup { group })).await?;
        self.announce("Group created");
        Ok(group_id)
    }

    pub async fn rename_group(&mut self, group_id: GroupId, label: &str) -> PinboardResult<bool> {
        let Some(group) = self.repos.groups.get(group_id).await? else {
            return Ok(false);
        };
        if group.label == label {
            return Ok(false);
        }
        self.run(Box::new(RenameGroup {
            group_id,
            old_label: group.label,
            new_label: label.to_string(),
        }))
        .await?;
        Ok(true)
    }

    /// Delete a group. Its cards stay on the tab, ungrouped.
    pub async fn delete_group(&mut self, group_id: GroupId) -> PinboardResult<bool> {
        let Some(command) = DeleteGroup::capture(&self.repos, group_id).await? else {
            return Ok(false);
        };
        self.run(Box::new(command)).await?;
        self.announce("Group deleted");
        Ok(true)
    }

    /// Link two elements of the current tab.
    pub async fn create_connection(
        &mut self,
        from: Endpoint,
        to: Endpoint,
        label: Option<String>,
        color: ConnectionColor,
    ) -> PinboardResult<ConnectionId> {
        let command = CreateConnection::new(&self.repos, self.tab.id, from, to, label, color).await?;
        let connection_id = command.connection.id;
        self.run(Box::new(command)).await?;
        self.announce("Connection created");
        Ok(connection_id)
    }

    pub async fn update_connection(
        &mut self,
        connection_id: ConnectionId,
        updates: ConnectionUpdate,
    ) -> PinboardResult<bool> {
        let Some(command) = UpdateConnection::capture(&self.repos, connection_id, updates).await? else {
            return Ok(false);
        };
        self.run(Box::new(command)).await?;
        Ok(true)
    }

    pub async fn delete_connection(&mut self, connection_id: ConnectionId) -> PinboardResult<bool> {
        let Some(connection) = self.repos.connections.get(connection_id).await? else {
            return Ok(false);
        };
        if connection.tab_id != self.tab.id {
            return Err(PinboardError::Validation(
                "connection is not on the current tab".to_string(),
            ));
        }
        self.run(Box::new(DeleteConnection { connection })).await?;
        self.announce("Connection deleted");
        Ok(true)
    }
}
