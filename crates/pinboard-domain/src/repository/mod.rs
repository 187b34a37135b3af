//! Typed repositories over the abstract [`Store`].
//!
//! Each entity maps to one [`Collection`]. Rows travel through the store as
//! JSON values; this module owns the conversion so that callers only ever see
//! domain types. Missing rows come back as `None`, never as an error.

use std::{fmt::Display, marker::PhantomData, sync::Arc};

use pinboard_core::{Collection, PinboardResult, Store};
use serde::{de::DeserializeOwned, Serialize};

use crate::{Board, Card, Connection, Endpoint, EndpointKind, Group, Image, Placement, Tab, TabId};

mod board_repository;
mod card_repository;
mod connection_repository;
mod group_repository;
mod image_repository;
mod placement_repository;
mod tab_repository;

/// An entity stored in exactly one collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn key(&self) -> String;
}

impl Record for Board {
    const COLLECTION: Collection = Collection::Boards;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Card {
    const COLLECTION: Collection = Collection::Cards;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Tab {
    const COLLECTION: Collection = Collection::Tabs;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Placement {
    const COLLECTION: Collection = Collection::Placements;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Group {
    const COLLECTION: Collection = Collection::Groups;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Connection {
    const COLLECTION: Collection = Collection::Connections;

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Image {
    const COLLECTION: Collection = Collection::Images;

    fn key(&self) -> String {
        self.hash.clone()
    }
}

pub struct Repository<T> {
    store: Arc<dyn Store>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub async fn get(&self, key: impl Display) -> PinboardResult<Option<T>> {
        match self.store.get(T::COLLECTION, &key.to_string()).await? {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, key: impl Display) -> PinboardResult<bool> {
        Ok(self.store.get(T::COLLECTION, &key.to_string()).await?.is_some())
    }

    pub async fn all(&self) -> PinboardResult<Vec<T>> {
        decode_rows(self.store.get_all(T::COLLECTION).await?)
    }

    pub async fn by_index(&self, field: &str, value: impl Display) -> PinboardResult<Vec<T>> {
        decode_rows(
            self.store
                .get_all_by_index(T::COLLECTION, field, &value.to_string())
                .await?,
        )
    }

    /// Insert or overwrite the row for `record`'s key.
    pub async fn put(&self, record: &T) -> PinboardResult<()> {
        let row = serde_json::to_value(record)?;
        self.store.put(T::COLLECTION, row).await
    }

    pub async fn delete(&self, key: impl Display) -> PinboardResult<()> {
        self.store.delete(T::COLLECTION, &key.to_string()).await
    }
}

fn decode_rows<T: Record>(rows: Vec<pinboard_core::Row>) -> PinboardResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(Into::into))
        .collect()
}

/// One repository per collection, all sharing the same store.
#[derive(Clone)]
pub struct Repositories {
    pub boards: Repository<Board>,
    pub cards: Repository<Card>,
    pub tabs: Repository<Tab>,
    pub placements: Repository<Placement>,
    pub groups: Repository<Group>,
    pub connections: Repository<Connection>,
    pub images: Repository<Image>,
    store: Arc<dyn Store>,
}

impl Repositories {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            boards: Repository::new(Arc::clone(&store)),
            cards: Repository::new(Arc::clone(&store)),
            tabs: Repository::new(Arc::clone(&store)),
            placements: Repository::new(Arc::clone(&store)),
            groups: Repository::new(Arc::clone(&store)),
            connections: Repository::new(Arc::clone(&store)),
            images: Repository::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Tab of the live placement or group `endpoint` points at.
    pub async fn endpoint_tab(&self, endpoint: Endpoint) -> PinboardResult<Option<TabId>> {
        Ok(match endpoint.kind {
            EndpointKind::Card => self.placements.get(endpoint.id).await?.map(|p| p.tab_id),
            EndpointKind::Group => self.groups.get(endpoint.id).await?.map(|g| g.tab_id),
        })
    }

    /// Whether both ends of `conn` resolve to live elements on its tab.
    pub async fn connection_resolves(&self, conn: &Connection) -> PinboardResult<bool> {
        for endpoint in [conn.from(), conn.to()] {
            if self.endpoint_tab(endpoint).await? != Some(conn.tab_id) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
