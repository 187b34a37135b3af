use pinboard_core::PinboardResult;

use super::Repository;
use crate::{Connection, ConnectionId, ConnectionUpdate, Endpoint, TabId};

impl Repository<Connection> {
    pub async fn by_tab(&self, tab_id: TabId) -> PinboardResult<Vec<Connection>> {
        self.by_index("tab_id", tab_id).await
    }

    /// Connections with `endpoint` on either end, each listed once.
    pub async fn attached_to(&self, endpoint: Endpoint) -> PinboardResult<Vec<Connection>> {
        let mut attached: Vec<Connection> = self
            .by_index("from_id", endpoint.id)
            .await?
            .into_iter()
            .filter(|c| c.from() == endpoint)
            .collect();
        for conn in self.by_index("to_id", endpoint.id).await? {
            if conn.to() == endpoint && !attached.iter().any(|c| c.id == conn.id) {
                attached.push(conn);
            }
        }
        Ok(attached)
    }

    pub async fn update(
        &self,
        id: ConnectionId,
        updates: ConnectionUpdate,
    ) -> PinboardResult<Option<Connection>> {
        let Some(mut conn) = self.get(id).await? else {
            return Ok(None);
        };
        conn.update(updates);
        self.put(&conn).await?;
        Ok(Some(conn))
    }
}
