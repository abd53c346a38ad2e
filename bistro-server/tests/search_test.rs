//! Proximity search against the embedded database.

mod common;

use bistro_server::search::{NearbyQuery, ProximitySearchService};
use bistro_server::utils::AppError;
use common::{PRECISION, create_restaurant, setup_db};
use rand::Rng;

// Legacy test scenario: a city center with one restaurant 40 m away
// and one roughly 20 km away.
const CENTER: (f64, f64) = (14.8859, 102.1428);

fn query(lat: f64, lng: f64, radius_km: Option<f64>) -> NearbyQuery {
    NearbyQuery {
        latitude: lat,
        longitude: lng,
        radius_km,
        limit: None,
        user_id: None,
    }
}

fn service(db: &surrealdb::Surreal<surrealdb::engine::local::Db>) -> ProximitySearchService {
    ProximitySearchService::new(db.clone(), PRECISION, 2.0, 100)
}

#[tokio::test]
async fn default_radius_includes_near_excludes_far() {
    let (_dir, db) = setup_db().await;
    create_restaurant(&db, "o1", "Near Cafe", CENTER.0 + 0.0004, CENTER.1).await;
    create_restaurant(&db, "o1", "Far Diner", CENTER.0 + 0.18, CENTER.1).await;

    let results = service(&db)
        .find_nearby(query(CENTER.0, CENTER.1, None))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].restaurant.name, "Near Cafe");
    assert!(results[0].distance_km < 0.1);
}

#[tokio::test]
async fn results_sorted_by_distance_without_duplicates() {
    let (_dir, db) = setup_db().await;
    for (i, offset) in [0.001, 0.004, 0.002, 0.008].iter().enumerate() {
        create_restaurant(&db, "o1", &format!("R{i}"), CENTER.0 + offset, CENTER.1).await;
    }

    let results = service(&db)
        .find_nearby(query(CENTER.0, CENTER.1, Some(5.0)))
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    for pair in results.windows(2) {
        assert!(pair[0].distance_km <= pair[1].distance_km);
    }
    let mut ids: Vec<String> = results
        .iter()
        .map(|r| r.restaurant.id.as_ref().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[tokio::test]
async fn limit_truncates_after_sorting() {
    let (_dir, db) = setup_db().await;
    for i in 1..=5 {
        create_restaurant(
            &db,
            "o1",
            &format!("R{i}"),
            CENTER.0 + 0.001 * i as f64,
            CENTER.1,
        )
        .await;
    }

    let mut q = query(CENTER.0, CENTER.1, Some(5.0));
    q.limit = Some(2);
    let results = service(&db).find_nearby(q).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].restaurant.name, "R1");
    assert_eq!(results[1].restaurant.name, "R2");
}

#[tokio::test]
async fn rejects_out_of_range_coordinates() {
    let (_dir, db) = setup_db().await;
    let err = service(&db)
        .find_nearby(query(95.0, 0.0, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn recall_over_randomly_placed_restaurants() {
    let (_dir, db) = setup_db().await;
    let svc = service(&db);
    let mut rng = rand::thread_rng();
    let radius_km = 3.0;

    // Scatter restaurants within ~3x the radius and remember which ones
    // truly fall inside the disk.
    let mut inside = 0usize;
    for i in 0..40 {
        let dlat = rng.gen_range(-0.08..0.08);
        let dlng = rng.gen_range(-0.08..0.08);
        let (lat, lng) = (CENTER.0 + dlat, CENTER.1 + dlng);
        create_restaurant(&db, "o1", &format!("S{i}"), lat, lng).await;
        if bistro_server::geo::haversine_km(CENTER.0, CENTER.1, lat, lng) <= radius_km {
            inside += 1;
        }
    }

    let results = svc
        .find_nearby(query(CENTER.0, CENTER.1, Some(radius_km)))
        .await
        .unwrap();

    // Every restaurant inside the disk is found (recall), and nothing
    // beyond the tolerance slips through (precision).
    assert_eq!(results.len(), inside);
    for r in &results {
        assert!(r.distance_km <= radius_km + 1e-6);
    }
}

#[tokio::test]
async fn search_is_logged_best_effort() {
    let (_dir, db) = setup_db().await;
    service(&db)
        .find_nearby(query(CENTER.0, CENTER.1, Some(1.0)))
        .await
        .unwrap();

    let mut resp = db
        .query("SELECT user_id, radius_km FROM search_log")
        .await
        .unwrap();
    let rows: Vec<serde_json::Value> = resp.take(0).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], "anon");
}
