use async_trait::async_trait;
use pinboard_core::{PinboardError, PinboardResult};

use super::Command;
use crate::{
    repository::Repositories, Connection, ConnectionColor, ConnectionId, ConnectionUpdate,
    Endpoint, TabId,
};

/// Create a connection between two elements of the same tab.
///
/// Idempotent: `apply` is a no-op when the connection row already exists.
pub struct CreateConnection {
    pub connection: Connection,
}

impl CreateConnection {
    /// Validate the endpoints and build the command. Fails when the
    /// endpoints are identical or do not both live on `tab_id`.
    pub async fn new(
        repos: &Repositories,
        tab_id: TabId,
        from: Endpoint,
        to: Endpoint,
        label: Option<String>,
        color: ConnectionColor,
    ) -> PinboardResult<Self> {
        let connection = Connection::new(tab_id, from, to)?
            .with_label(label)
            .with_color(color);
        ensure_resolves(repos, &connection).await?;
        Ok(Self { connection })
    }
}

async fn ensure_resolves(repos: &Repositories, conn: &Connection) -> PinboardResult<()> {
    for endpoint in [conn.from(), conn.to()] {
        match repos.endpoint_tab(endpoint).await? {
            Some(tab_id) if tab_id == conn.tab_id => {}
            Some(_) => {
                return Err(PinboardError::Validation(format!(
                    "{} is on a different tab",
                    endpoint
                )))
            }
            None => return Err(PinboardError::NotFound(format!("endpoint {}", endpoint))),
        }
    }
    Ok(())
}

#[async_trait]
impl Command for CreateConnection {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        if repos.connections.exists(self.connection.id).await? {
            return Ok(());
        }
        if self.connection.is_self_loop() {
            return Err(PinboardError::Validation(
                "a connection cannot link an element to itself".to_string(),
            ));
        }
        ensure_resolves(repos, &self.connection).await?;
        repos.connections.put(&self.connection).await
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        repos.connections.delete(self.connection.id).await
    }

    fn description(&self) -> String {
        "Create connection".to_string()
    }
}

pub struct DeleteConnection {
    pub connection: Connection,
}

#[async_trait]
impl Command for DeleteConnection {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        repos.connections.delete(self.connection.id).await
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        crate::snapshot::restore_connections(repos, std::slice::from_ref(&self.connection)).await
    }

    fn description(&self) -> String {
        "Delete connection".to_string()
    }
}

/// Edit a connection's label or colour
pub struct UpdateConnection {
    pub connection_id: ConnectionId,
    pub updates: ConnectionUpdate,
    pub previous: ConnectionUpdate,
}

impl UpdateConnection {
    pub async fn capture(
        repos: &Repositories,
        connection_id: ConnectionId,
        updates: ConnectionUpdate,
    ) -> PinboardResult<Option<Self>> {
        let Some(conn) = repos.connections.get(connection_id).await? else {
            return Ok(None);
        };
        let mut updated = conn.clone();
        updated.update(updates.clone());
        if updated == conn {
            return Ok(None);
        }
        Ok(Some(Self {
            connection_id,
            previous: updates.inverse(&conn),
            updates,
        }))
    }
}

#[async_trait]
impl Command for UpdateConnection {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        repos
            .connections
            .update(self.connection_id, self.updates.clone())
            .await?;
        Ok(())
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        repos
            .connections
            .update(self.connection_id, self.previous.clone())
            .await?;
        Ok(())
    }

    fn description(&self) -> String {
        "Update connection".to_string()
    }
}
