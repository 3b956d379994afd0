//! SurrealDB implementation of [`GroupRepository`].
//!
//! Membership is a `member_of` graph edge (user -> group). Creating a
//! group writes the record and the creator's membership edge in the same
//! query round trip.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wishgroup_core::error::WishgroupResult;
use wishgroup_core::include::GroupInclude;
use wishgroup_core::models::group::{CreateGroup, Group, GroupDetails, UpdateGroup};
use wishgroup_core::models::invitation::Invitation;
use wishgroup_core::models::user::User;
use wishgroup_core::models::wishlist::WishList;
use wishgroup_core::repository::{GroupRepository, GroupScope};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct GroupRow {
    name: String,
    icon: String,
    creator_id: String,
    admin_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group(self, id: Uuid) -> Result<Group, DbError> {
        Ok(Group {
            id,
            name: self.name,
            icon: self.icon,
            creator_id: parse_uuid(&self.creator_id)?,
            admin_id: parse_uuid(&self.admin_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct GroupRowWithId {
    record_id: String,
    name: String,
    icon: String,
    creator_id: String,
    admin_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GroupRowWithId {
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

/// DB-side row struct for user rows returned from association queries.
#[derive(Debug, SurrealValue)]
struct MemberRow {
    record_id: String,
    first_name: String,
    last_name: String,
    display_name: String,
    email: String,
    role_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
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

/// DB-side row struct for invitation association queries.
#[derive(Debug, SurrealValue)]
struct InvitationRow {
    record_id: String,
    group_id: String,
    creator_id: String,
    email: String,
    token: String,
    times_sent: u32,
    sent_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvitationRow {
    fn try_into_invitation(self) -> Result<Invitation, DbError> {
        Ok(Invitation {
            id: parse_uuid(&self.record_id)?,
            group_id: parse_uuid(&self.group_id)?,
            creator_id: parse_uuid(&self.creator_id)?,
            email: self.email,
            token: self.token,
            times_sent: self.times_sent,
            sent_at: self.sent_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct for wishlist association queries.
#[derive(Debug, SurrealValue)]
struct WishListRow {
    record_id: String,
    group_id: String,
    creator_id: String,
    description: String,
    rank: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WishListRow {
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

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Row struct for admin-id point reads backing the scope check.
#[derive(Debug, SurrealValue)]
struct AdminRow {
    admin_id: String,
}

fn parse_uuid(raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))
}

/// SurrealDB implementation of the Group repository.
#[derive(Clone)]
pub struct SurrealGroupRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGroupRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn load_user(&self, id: Uuid) -> WishgroupResult<Option<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE id = type::record('user', $id)",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_user()?)),
            None => Ok(None),
        }
    }

    async fn load_members(&self, group_id: Uuid) -> WishgroupResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE id IN (\
                     SELECT VALUE in FROM member_of \
                     WHERE out = type::record('group', $group_id)\
                 ) \
                 ORDER BY created_at ASC",
            )
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn load_invitations(&self, group_id: Uuid) -> WishgroupResult<Vec<Invitation>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM invitation \
                 WHERE group_id = $group_id ORDER BY created_at ASC",
            )
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvitationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_invitation())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn load_wishlists(&self, group_id: Uuid) -> WishgroupResult<Vec<WishList>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM wish_list \
                 WHERE group_id = $group_id ORDER BY created_at ASC",
            )
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WishListRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_wishlist())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    /// Resolve the requested associations for a loaded group.
    async fn load_details(
        &self,
        group: Group,
        includes: &[GroupInclude],
    ) -> WishgroupResult<GroupDetails> {
        let mut details = GroupDetails::bare(group);

        for include in includes {
            match include {
                GroupInclude::Admin => {
                    details.admin = self.load_user(details.group.admin_id).await?;
                }
                GroupInclude::Creator => {
                    details.creator = self.load_user(details.group.creator_id).await?;
                }
                GroupInclude::Users => {
                    details.users = Some(self.load_members(details.group.id).await?);
                }
                GroupInclude::WishLists => {
                    details.wish_lists = Some(self.load_wishlists(details.group.id).await?);
                }
                GroupInclude::Invitations => {
                    details.invitations = Some(self.load_invitations(details.group.id).await?);
                }
            }
        }

        Ok(details)
    }
}

impl<C: Connection> GroupRepository for SurrealGroupRepository<C> {
    async fn create(&self, input: CreateGroup) -> WishgroupResult<Group> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let creator_str = input.creator_id.to_string();

        // Record and the creator's membership edge in one round trip.
        let query = format!(
            "CREATE type::record('group', $id) SET \
             name = $name, icon = $icon, \
             creator_id = $creator_id, admin_id = $admin_id; \
             RELATE user:`{creator_str}` -> member_of -> group:`{id_str}`;"
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("icon", input.icon))
            .bind(("creator_id", creator_str))
            .bind(("admin_id", input.admin_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "group".into(),
            id: id_str,
        })?;

        Ok(row.into_group(id)?)
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        includes: &[GroupInclude],
    ) -> WishgroupResult<Option<GroupDetails>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('group', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let group = row.into_group(id)?;
        Ok(Some(self.load_details(group, includes).await?))
    }

    async fn list(&self, includes: &[GroupInclude]) -> WishgroupResult<Vec<GroupDetails>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let group = row.try_into_group()?;
            details.push(self.load_details(group, includes).await?);
        }

        Ok(details)
    }

    async fn update(&self, id: Uuid, input: UpdateGroup) -> WishgroupResult<Group> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.icon.is_some() {
            sets.push("icon = $icon");
        }
        if input.admin_id.is_some() {
            sets.push("admin_id = $admin_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('group', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(icon) = input.icon {
            builder = builder.bind(("icon", icon));
        }
        if let Some(admin_id) = input.admin_id {
            builder = builder.bind(("admin_id", admin_id.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "group".into(),
            id: id_str,
        })?;

        Ok(row.into_group(id)?)
    }

    async fn delete(&self, id: Uuid) -> WishgroupResult<()> {
        let id_str = id.to_string();

        // Remove membership edges and dependent rows, then the record.
        let query = format!(
            "DELETE member_of WHERE out = group:`{id_str}`; \
             DELETE invitation WHERE group_id = $id; \
             DELETE wish_list WHERE group_id = $id; \
             DELETE type::record('group', $id);"
        );

        self.db
            .query(query)
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> WishgroupResult<()> {
        let group_str = group_id.to_string();
        let user_str = user_id.to_string();

        // Verify both endpoints exist before creating the edge.
        let mut check = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE id = type::record('user', $user_id) GROUP ALL; \
                 SELECT count() AS total FROM group \
                 WHERE id = type::record('group', $group_id) GROUP ALL; \
                 SELECT count() AS total FROM member_of \
                 WHERE in = type::record('user', $user_id) \
                 AND out = type::record('group', $group_id) GROUP ALL;",
            )
            .bind(("user_id", user_str.clone()))
            .bind(("group_id", group_str.clone()))
            .await
            .map_err(DbError::from)?;

        let users: Vec<CountRow> = check.take(0).map_err(DbError::from)?;
        if users.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_str,
            }
            .into());
        }

        let groups: Vec<CountRow> = check.take(1).map_err(DbError::from)?;
        if groups.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "group".into(),
                id: group_str,
            }
            .into());
        }

        let edges: Vec<CountRow> = check.take(2).map_err(DbError::from)?;
        if edges.first().map(|r| r.total).unwrap_or(0) > 0 {
            // Membership is a set, not a multiset.
            return Ok(());
        }

        let query = format!("RELATE user:`{user_str}` -> member_of -> group:`{group_str}`;");
        self.db.query(query).await.map_err(DbError::from)?;

        Ok(())
    }

    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> WishgroupResult<()> {
        self.db
            .query(
                "DELETE member_of WHERE \
                 in = type::record('user', $user_id) AND \
                 out = type::record('group', $group_id)",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn scope(&self, group_id: Uuid, user_id: Uuid) -> WishgroupResult<GroupScope> {
        let mut result = self
            .db
            .query(
                "SELECT admin_id FROM type::record('group', $group_id); \
                 SELECT count() AS total FROM member_of \
                 WHERE in = type::record('user', $user_id) \
                 AND out = type::record('group', $group_id) GROUP ALL;",
            )
            .bind(("group_id", group_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let admins: Vec<AdminRow> = result.take(0).map_err(DbError::from)?;
        let Some(admin) = admins.into_iter().next() else {
            return Ok(GroupScope::missing());
        };

        let members: Vec<CountRow> = result.take(1).map_err(DbError::from)?;
        let is_member = members.first().map(|r| r.total).unwrap_or(0) > 0;

        Ok(GroupScope {
            exists: true,
            is_member,
            is_admin: parse_uuid(&admin.admin_id)? == user_id,
        })
    }

    async fn user_exists(&self, user_id: Uuid) -> WishgroupResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE id = type::record('user', $id) GROUP ALL",
            )
            .bind(("id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}
