use async_trait::async_trait;
use pinboard_core::PinboardResult;

use super::Command;
use crate::{
    repository::Repositories,
    snapshot::{restore_connections, restore_placements},
    Connection, Endpoint, Placement, PlacementId, PlacementSlot,
};

/// Move a placement and record the group it ends up in
pub struct MovePlacement {
    pub placement_id: PlacementId,
    pub from: PlacementSlot,
    pub to: PlacementSlot,
}

impl MovePlacement {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    async fn move_to(&self, repos: &Repositories, slot: PlacementSlot) -> PinboardResult<()> {
        let mut slot = slot;
        if let Some(group_id) = slot.group_id {
            if !repos.groups.exists(group_id).await? {
                slot.group_id = None;
            }
        }
        repos
            .placements
            .update(self.placement_id, slot.as_update())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Command for MovePlacement {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        self.move_to(repos, self.to).await
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        self.move_to(repos, self.from).await
    }

    fn description(&self) -> String {
        format!(
            "Move card to ({:.0}, {:.0})",
            self.to.position.x, self.to.position.y
        )
    }
}

/// Take a card off a tab together with every connection anchored to it.
/// The card itself stays in the library.
pub struct RemovePlacement {
    pub placement: Placement,
    pub connections: Vec<Connection>,
}

impl RemovePlacement {
    pub async fn capture(
        repos: &Repositories,
        placement_id: PlacementId,
    ) -> PinboardResult<Option<Self>> {
        let Some(placement) = repos.placements.get(placement_id).await? else {
            return Ok(None);
        };
        let connections = repos
            .connections
            .attached_to(Endpoint::card(placement_id))
            .await?;
        Ok(Some(Self {
            placement,
            connections,
        }))
    }
}

#[async_trait]
impl Command for RemovePlacement {
    async fn apply(&self, repos: &Repositories) -> PinboardResult<()> {
        // Re-query so connections created after capture are not left dangling.
        for conn in repos
            .connections
            .attached_to(Endpoint::card(self.placement.id))
            .await?
        {
            repos.connections.delete(conn.id).await?;
        }
        repos.placements.delete(self.placement.id).await
    }

    async fn revert(&self, repos: &Repositories) -> PinboardResult<()> {
        restore_placements(repos, std::slice::from_ref(&self.placement)).await?;
        restore_connections(repos, &self.connections).await
    }

    fn description(&self) -> String {
        "Remove card from tab".to_string()
    }
}
