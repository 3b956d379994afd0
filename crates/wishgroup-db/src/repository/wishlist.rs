//! SurrealDB implementation of [`WishListRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wishgroup_core::error::WishgroupResult;
use wishgroup_core::include::WishListInclude;
use wishgroup_core::models::group::Group;
use wishgroup_core::models::user::User;
use wishgroup_core::models::wishlist::{
    CreateWishList, UpdateWishList, WishList, WishListDetails,
};
use wishgroup_core::repository::WishListRepository;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct WishListRow {
    group_id: String,
    creator_id: String,
    description: String,
    rank: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WishListRow {
    fn into_wishlist(self, id: Uuid) -> Result<WishList, DbError> {
        Ok(WishList {
            id,
            group_id: parse_uuid(&self.group_id)?,
            creator_id: parse_uuid(&self.creator_id)?,
            description: self.description,
            rank: self.rank,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct WishListRowWithId {
    record_id: String,
    group_id: String,
    creator_id: String,
    description: String,
    rank: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WishListRowWithId {
    fn try_into_wishlist(self) -> Result<WishList, DbError> {
        Ok(WishList {
            id: parse_uuid(&self.record_id)?,
            group_id: parse_uuid(&self.group_id)?,
            creator_id: parse_uuid(&self.creator_id)?,
            description: self.description,
            rank: self.rank,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct for the `group` association.
#[derive(Debug, SurrealValue)]
struct GroupRow {
    record_id: String,
    name: String,
    icon: String,
    creator_id: String,
    admin_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GroupRow {
    fn try_into_group(self) -> Result<Group, DbError> {
        Ok(Group {
            id: parse_uuid(&self.record_id)?,
            name: self.name,
            icon: self.icon,
            creator_id: parse_uuid(&self.creator_id)?,
            admin_id: parse_uuid(&self.admin_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct for the `creator` association.
#[derive(Debug, SurrealValue)]
struct CreatorRow {
    record_id: String,
    first_name: String,
    last_name: String,
    display_name: String,
    email: String,
    role_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CreatorRow {
    fn try_into_user(self) -> Result<User, DbError> {
        Ok(User {
            id: parse_uuid(&self.record_id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            display_name: self.display_name,
            email: self.email,
            role_id: parse_uuid(&self.role_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))
}

/// SurrealDB implementation of the WishList repository.
#[derive(Clone)]
pub struct SurrealWishListRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWishListRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn load_group(&self, id: Uuid) -> WishgroupResult<Option<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE id = type::record('group', $id)",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_group()?)),
            None => Ok(None),
        }
    }

    async fn load_creator(&self, id: Uuid) -> WishgroupResult<Option<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE id = type::record('user', $id)",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CreatorRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_user()?)),
            None => Ok(None),
        }
    }

    async fn load_details(
        &self,
        wishlist: WishList,
        includes: &[WishListInclude],
    ) -> WishgroupResult<WishListDetails> {
        let mut details = WishListDetails::bare(wishlist);

        for include in includes {
            match include {
                WishListInclude::Group => {
                    details.group = self.load_group(details.wishlist.group_id).await?;
                }
                WishListInclude::Creator => {
                    details.creator = self.load_creator(details.wishlist.creator_id).await?;
                }
            }
        }

        Ok(details)
    }
}

impl<C: Connection> WishListRepository for SurrealWishListRepository<C> {
    async fn create(&self, input: CreateWishList) -> WishgroupResult<WishList> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('wish_list', $id) SET \
                 group_id = $group_id, creator_id = $creator_id, \
                 description = $description, rank = $rank",
            )
            .bind(("id", id_str.clone()))
            .bind(("group_id", input.group_id.to_string()))
            .bind(("creator_id", input.creator_id.to_string()))
            .bind(("description", input.description))
            .bind(("rank", input.rank))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<WishListRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "wish_list".into(),
            id: id_str,
        })?;

        Ok(row.into_wishlist(id)?)
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        includes: &[WishListInclude],
    ) -> WishgroupResult<Option<WishListDetails>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('wish_list', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WishListRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let wishlist = row.into_wishlist(id)?;
        Ok(Some(self.load_details(wishlist, includes).await?))
    }

    async fn list_by_group(
        &self,
        group_id: Uuid,
        includes: &[WishListInclude],
    ) -> WishgroupResult<Vec<WishListDetails>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM wish_list \
                 WHERE group_id = $group_id ORDER BY created_at ASC",
            )
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WishListRowWithId> = result.take(0).map_err(DbError::from)?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let wishlist = row.try_into_wishlist()?;
            details.push(self.load_details(wishlist, includes).await?);
        }

        Ok(details)
    }

    async fn update(&self, id: Uuid, input: UpdateWishList) -> WishgroupResult<WishList> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.rank.is_some() {
            sets.push("rank = $rank");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('wish_list', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(rank) = input.rank {
            builder = builder.bind(("rank", rank));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<WishListRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "wish_list".into(),
            id: id_str,
        })?;

        Ok(row.into_wishlist(id)?)
    }

    async fn delete(&self, id: Uuid) -> WishgroupResult<()> {
        self.db
            .query("DELETE type::record('wish_list', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
