//! Integration tests for the WishList repository using in-memory
//! SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use wishgroup_core::include::WishListInclude;
use wishgroup_core::models::group::CreateGroup;
use wishgroup_core::models::role::Role;
use wishgroup_core::models::user::CreateUser;
use wishgroup_core::models::wishlist::{CreateWishList, UpdateWishList};
use wishgroup_core::repository::{
    GroupRepository, RoleRepository, UserRepository, WishListRepository,
};
use wishgroup_db::repository::{
    SurrealGroupRepository, SurrealRoleRepository, SurrealUserRepository,
    SurrealWishListRepository,
};

async fn setup() -> (
    Surreal<surrealdb::engine::local::Db>,
    Uuid, // user_id
    Uuid, // group_id
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    wishgroup_db::run_migrations(&db).await.unwrap();
    wishgroup_db::seed_roles(&db).await.unwrap();

    let roles = SurrealRoleRepository::new(db.clone());
    let user_role = roles.get_by_name(Role::USER).await.unwrap().unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let user = users
        .create(CreateUser {
            first_name: "Wish".into(),
            last_name: "Maker".into(),
            display_name: "Wish Maker".into(),
            email: "wishmaker@example.com".into(),
            role_id: user_role.id,
        })
        .await
        .unwrap();

    let groups = SurrealGroupRepository::new(db.clone());
    let group = groups
        .create(CreateGroup {
            name: "Wishes".into(),
            icon: "https://icons.example.com/wish.png".into(),
            creator_id: user.id,
            admin_id: user.id,
        })
        .await
        .unwrap();

    (db, user.id, group.id)
}

fn item(user: Uuid, group: Uuid, description: &str, rank: u32) -> CreateWishList {
    CreateWishList {
        group_id: group,
        creator_id: user,
        description: description.into(),
        rank,
    }
}

#[tokio::test]
async fn create_and_read_back() {
    let (db, user, group) = setup().await;
    let wishlists = SurrealWishListRepository::new(db.clone());

    let created = wishlists
        .create(item(user, group, "a red bicycle", 1))
        .await
        .unwrap();
    assert_eq!(created.rank, 1);
    assert_eq!(created.creator_id, user);

    let details = wishlists.get_by_id(created.id, &[]).await.unwrap().unwrap();
    assert_eq!(details.wishlist.description, "a red bicycle");
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let (db, user, group) = setup().await;
    let wishlists = SurrealWishListRepository::new(db.clone());

    let created = wishlists
        .create(item(user, group, "socks", 3))
        .await
        .unwrap();

    let updated = wishlists
        .update(
            created.id,
            UpdateWishList {
                description: None,
                rank: Some(1),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, "socks");
    assert_eq!(updated.rank, 1);
    assert_eq!(updated.creator_id, user);
    assert_eq!(updated.group_id, group);
}

#[tokio::test]
async fn list_by_group_is_scoped() {
    let (db, user, group) = setup().await;
    let groups = SurrealGroupRepository::new(db.clone());
    let other = groups
        .create(CreateGroup {
            name: "Other".into(),
            icon: "https://icons.example.com/o.png".into(),
            creator_id: user,
            admin_id: user,
        })
        .await
        .unwrap();

    let wishlists = SurrealWishListRepository::new(db.clone());
    wishlists.create(item(user, group, "one", 1)).await.unwrap();
    wishlists.create(item(user, group, "two", 2)).await.unwrap();
    wishlists
        .create(item(user, other.id, "elsewhere", 1))
        .await
        .unwrap();

    let listed = wishlists.list_by_group(group, &[]).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|d| d.wishlist.group_id == group));
}

#[tokio::test]
async fn includes_resolve_group_and_creator() {
    let (db, user, group) = setup().await;
    let wishlists = SurrealWishListRepository::new(db.clone());

    let created = wishlists
        .create(item(user, group, "a kite", 2))
        .await
        .unwrap();

    let details = wishlists
        .get_by_id(
            created.id,
            &[WishListInclude::Group, WishListInclude::Creator],
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(details.group.unwrap().id, group);
    assert_eq!(details.creator.unwrap().id, user);
}

#[tokio::test]
async fn delete_removes_the_row() {
    let (db, user, group) = setup().await;
    let wishlists = SurrealWishListRepository::new(db.clone());

    let created = wishlists
        .create(item(user, group, "gone", 1))
        .await
        .unwrap();
    wishlists.delete(created.id).await.unwrap();

    assert!(wishlists.get_by_id(created.id, &[]).await.unwrap().is_none());
}
