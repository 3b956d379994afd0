//! SurrealDB implementation of [`InvitationRepository`].
//!
//! The `(email, group_id)` pair is guarded both by a pre-check (so the
//! caller gets a field-level validation error) and by the unique index
//! (which backstops the race between check and insert).

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wishgroup_core::error::{FieldError, WishgroupError, WishgroupResult};
use wishgroup_core::include::InvitationInclude;
use wishgroup_core::models::group::Group;
use wishgroup_core::models::invitation::{
    CreateInvitation, Invitation, InvitationDetails, UpdateInvitation,
};
use wishgroup_core::models::user::User;
use wishgroup_core::repository::InvitationRepository;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct InvitationRow {
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
    fn into_invitation(self, id: Uuid) -> Result<Invitation, DbError> {
        Ok(Invitation {
            id,
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

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct InvitationRowWithId {
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

impl InvitationRowWithId {
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

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))
}

/// SurrealDB implementation of the Invitation repository.
#[derive(Clone)]
pub struct SurrealInvitationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealInvitationRepository<C> {
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
        invitation: Invitation,
        includes: &[InvitationInclude],
    ) -> WishgroupResult<InvitationDetails> {
        let mut details = InvitationDetails::bare(invitation);

        for include in includes {
            match include {
                InvitationInclude::Group => {
                    details.group = self.load_group(details.invitation.group_id).await?;
                }
                InvitationInclude::Creator => {
                    details.creator = self.load_creator(details.invitation.creator_id).await?;
                }
            }
        }

        Ok(details)
    }
}

impl<C: Connection> InvitationRepository for SurrealInvitationRepository<C> {
    async fn create(&self, input: CreateInvitation) -> WishgroupResult<Invitation> {
        // Pre-check the unique pair so the caller gets a field-level
        // validation error instead of an opaque index failure.
        let mut check = self
            .db
            .query(
                "SELECT count() AS total FROM invitation \
                 WHERE email = $email AND group_id = $group_id GROUP ALL",
            )
            .bind(("email", input.email.clone()))
            .bind(("group_id", input.group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let existing: Vec<CountRow> = check.take(0).map_err(DbError::from)?;
        if existing.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Err(WishgroupError::validation(vec![
                FieldError::new("email", "email must be unique"),
                FieldError::new("groupUuid", "groupUuid must be unique"),
            ]));
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('invitation', $id) SET \
                 group_id = $group_id, creator_id = $creator_id, \
                 email = $email, token = $token, \
                 times_sent = $times_sent, sent_at = $sent_at, \
                 expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("group_id", input.group_id.to_string()))
            .bind(("creator_id", input.creator_id.to_string()))
            .bind(("email", input.email))
            .bind(("token", input.token))
            .bind(("times_sent", input.times_sent))
            .bind(("sent_at", input.sent_at))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<InvitationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "invitation".into(),
            id: id_str,
        })?;

        Ok(row.into_invitation(id)?)
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        includes: &[InvitationInclude],
    ) -> WishgroupResult<Option<InvitationDetails>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('invitation', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvitationRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let invitation = row.into_invitation(id)?;
        Ok(Some(self.load_details(invitation, includes).await?))
    }

    async fn list_by_group(
        &self,
        group_id: Uuid,
        includes: &[InvitationInclude],
    ) -> WishgroupResult<Vec<InvitationDetails>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM invitation \
                 WHERE group_id = $group_id ORDER BY created_at ASC",
            )
            .bind(("group_id", group_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<InvitationRowWithId> = result.take(0).map_err(DbError::from)?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let invitation = row.try_into_invitation()?;
            details.push(self.load_details(invitation, includes).await?);
        }

        Ok(details)
    }

    async fn update(&self, id: Uuid, input: UpdateInvitation) -> WishgroupResult<Invitation> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.email.is_some() {
            sets.push("email = $email");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('invitation', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<InvitationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or(DbError::NotFound {
            entity: "invitation".into(),
            id: id_str,
        })?;

        Ok(row.into_invitation(id)?)
    }

    async fn delete(&self, id: Uuid) -> WishgroupResult<()> {
        self.db
            .query("DELETE type::record('invitation', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
