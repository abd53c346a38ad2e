//! Restaurant repository: geohash invariant and owner listing.

mod common;

use bistro_server::db::models::RestaurantUpdate;
use bistro_server::db::repository::{RepoError, RestaurantRepository};
use bistro_server::geo;
use common::{PRECISION, create_restaurant, id_str, restaurant_payload, setup_db};

#[tokio::test]
async fn create_stores_server_computed_geohash() {
    let (_dir, db) = setup_db().await;
    let r = create_restaurant(&db, "o1", "Bistro", 14.8859, 102.1428).await;

    let expected = geo::encode(14.8859, 102.1428, PRECISION).unwrap();
    assert_eq!(r.geohash, expected);
    assert!(r.created_at.is_some());
}

#[tokio::test]
async fn update_of_coordinates_recomputes_geohash() {
    let (_dir, db) = setup_db().await;
    let repo = RestaurantRepository::new(db.clone(), PRECISION);
    let r = create_restaurant(&db, "o1", "Bistro", 14.8859, 102.1428).await;

    let moved = repo
        .update(
            &id_str(&r.id),
            RestaurantUpdate {
                latitude: Some(51.5074),
                longitude: Some(-0.1278),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        moved.geohash,
        geo::encode(51.5074, -0.1278, PRECISION).unwrap()
    );
    // Untouched fields survive the merge
    assert_eq!(moved.name, "Bistro");
    assert_eq!(moved.owner_id, "o1");
}

#[tokio::test]
async fn update_without_coordinates_keeps_geohash() {
    let (_dir, db) = setup_db().await;
    let repo = RestaurantRepository::new(db.clone(), PRECISION);
    let r = create_restaurant(&db, "o1", "Bistro", 14.8859, 102.1428).await;

    let renamed = repo
        .update(
            &id_str(&r.id),
            RestaurantUpdate {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(renamed.name, "Renamed");
    assert_eq!(renamed.geohash, r.geohash);
}

#[tokio::test]
async fn update_missing_restaurant_is_not_found() {
    let (_dir, db) = setup_db().await;
    let repo = RestaurantRepository::new(db.clone(), PRECISION);

    let err = repo
        .update("restaurant:missing", RestaurantUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn owner_listing_returns_only_their_restaurants() {
    let (_dir, db) = setup_db().await;
    let repo = RestaurantRepository::new(db.clone(), PRECISION);
    create_restaurant(&db, "alice", "A1", 14.88, 102.14).await;
    create_restaurant(&db, "alice", "A2", 14.89, 102.15).await;
    create_restaurant(&db, "bob", "B1", 14.90, 102.16).await;

    let mine = repo.find_by_owner("alice").await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r.owner_id == "alice"));
}

#[tokio::test]
async fn create_rejects_invalid_coordinates() {
    let (_dir, db) = setup_db().await;
    let repo = RestaurantRepository::new(db.clone(), PRECISION);

    let err = repo
        .create(restaurant_payload("o1", "Broken", 95.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
