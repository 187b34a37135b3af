use pinboard_core::PinboardResult;

use super::Repository;
use crate::{Group, GroupId, GroupUpdate, TabId};

impl Repository<Group> {
    pub async fn by_tab(&self, tab_id: TabId) -> PinboardResult<Vec<Group>> {
        self.by_index("tab_id", tab_id).await
    }

    pub async fn update(&self, id: GroupId, updates: GroupUpdate) -> PinboardResult<Option<Group>> {
        let Some(mut group) = self.get(id).await? else {
            return Ok(None);
        };
        group.update(updates);
        self.put(&group).await?;
        Ok(Some(group))
    }
}
