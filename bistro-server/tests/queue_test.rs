//! Queue projections: joined booking rows, per-restaurant lookups.

mod common;

use bistro_server::queue::QueueView;
use bistro_server::reservation::ReservationManager;
use common::{create_restaurant, id_str, setup_db};

#[tokio::test]
async fn my_active_bookings_joins_names_and_numbers() {
    let (_dir, db) = setup_db().await;
    let restaurant = create_restaurant(&db, "owner", "Noodle House", 14.8859, 102.1428).await;
    let rid = id_str(&restaurant.id);
    let manager = ReservationManager::new(db.clone());
    let table = manager.add_table(&rid, 5).await.unwrap();
    manager
        .book_table(&rid, &id_str(&table.id), "alice")
        .await
        .unwrap();

    let queue = QueueView::new(db.clone());
    let rows = queue.my_active_bookings("alice").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].restaurant_name, "Noodle House");
    assert_eq!(rows[0].table_number, 5);
    assert_eq!(rows[0].user_id, "alice");

    assert!(queue.my_active_bookings("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn canceled_bookings_leave_the_queue() {
    let (_dir, db) = setup_db().await;
    let restaurant = create_restaurant(&db, "owner", "Bistro", 14.8859, 102.1428).await;
    let rid = id_str(&restaurant.id);
    let manager = ReservationManager::new(db.clone());
    let table = manager.add_table(&rid, 1).await.unwrap();
    let booking = manager
        .book_table(&rid, &id_str(&table.id), "alice")
        .await
        .unwrap();

    manager.cancel_booking(&id_str(&booking.id)).await.unwrap();

    let queue = QueueView::new(db.clone());
    assert!(queue.my_active_bookings("alice").await.unwrap().is_empty());
    assert!(queue.my_booking_at(&rid, "alice").await.unwrap().is_none());
}

#[tokio::test]
async fn my_booking_at_returns_most_recent_open_booking() {
    let (_dir, db) = setup_db().await;
    let restaurant = create_restaurant(&db, "owner", "Bistro", 14.8859, 102.1428).await;
    let other = create_restaurant(&db, "owner", "Other", 14.89, 102.15).await;
    let (rid, oid) = (id_str(&restaurant.id), id_str(&other.id));
    let manager = ReservationManager::new(db.clone());

    let t1 = manager.add_table(&rid, 1).await.unwrap();
    let t2 = manager.add_table(&oid, 1).await.unwrap();
    manager.book_table(&rid, &id_str(&t1.id), "alice").await.unwrap();
    manager.book_table(&oid, &id_str(&t2.id), "alice").await.unwrap();

    let queue = QueueView::new(db.clone());
    let here = queue.my_booking_at(&rid, "alice").await.unwrap().unwrap();
    assert_eq!(here.restaurant_id, rid);
    assert_eq!(here.table_number, 1);

    // Two open bookings overall, one per restaurant
    assert_eq!(queue.my_active_bookings("alice").await.unwrap().len(), 2);
}

#[tokio::test]
async fn tables_of_orders_by_table_number() {
    let (_dir, db) = setup_db().await;
    let restaurant = create_restaurant(&db, "owner", "Bistro", 14.8859, 102.1428).await;
    let rid = id_str(&restaurant.id);
    let manager = ReservationManager::new(db.clone());
    for n in [3, 1, 2] {
        manager.add_table(&rid, n).await.unwrap();
    }

    let tables = QueueView::new(db.clone()).tables_of(&rid).await.unwrap();
    let numbers: Vec<i64> = tables.iter().map(|t| t.table_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}
