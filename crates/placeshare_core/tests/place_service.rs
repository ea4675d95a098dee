mod common;

use common::{cafe, count_rows, new_user};
use placeshare_core::db::open_db_in_memory;
use placeshare_core::{
    NewPlace, NotFoundTarget, PlaceOperation, PlaceService, PlaceServiceError, PlaceUpdate,
    SqliteEntityStore, StaticGeocoder, UserRepository, DEFAULT_PLACE_IMAGE, STATIC_LOCATION,
};
use rusqlite::Connection;
use uuid::Uuid;

fn service(conn: &Connection) -> PlaceService<SqliteEntityStore<'_>, StaticGeocoder> {
    PlaceService::new(SqliteEntityStore::try_new(conn).unwrap(), StaticGeocoder)
}

fn places_of(conn: &Connection, user_id: Uuid) -> Vec<Uuid> {
    let store = SqliteEntityStore::try_new(conn).unwrap();
    store.find_user(user_id).unwrap().unwrap().places
}

#[test]
fn create_links_place_into_creator_list() {
    let conn = open_db_in_memory().unwrap();
    let user = new_user(&conn, "u1@example.com");
    let service = service(&conn);

    let place = service.create_place(&cafe(user.id)).unwrap();

    assert_eq!(place.creator, user.id);
    assert_eq!(place.title, "Cafe");
    assert_eq!(place.image, DEFAULT_PLACE_IMAGE);
    assert_eq!(place.location, STATIC_LOCATION);
    assert_eq!(places_of(&conn, user.id), vec![place.id]);
}

#[test]
fn create_then_get_returns_same_record() {
    let conn = open_db_in_memory().unwrap();
    let user = new_user(&conn, "u1@example.com");
    let service = service(&conn);

    let created = service.create_place(&cafe(user.id)).unwrap();
    let loaded = service.get_place(created.id).unwrap();

    assert_eq!(loaded, created);
}

#[test]
fn create_with_unknown_creator_is_unprocessable_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    new_user(&conn, "u1@example.com");
    let service = service(&conn);

    let err = service.create_place(&cafe(Uuid::new_v4())).unwrap_err();

    assert!(matches!(err, PlaceServiceError::UnprocessableEntity(_)));
    assert_eq!(count_rows(&conn, "places"), 0);
    assert_eq!(count_rows(&conn, "user_places"), 0);
}

#[test]
fn create_with_unresolvable_address_fails_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let user = new_user(&conn, "u1@example.com");
    let service = service(&conn);

    let draft = NewPlace {
        address: "   ".to_string(),
        ..cafe(user.id)
    };
    let err = service.create_place(&draft).unwrap_err();

    assert!(matches!(err, PlaceServiceError::GeocodeError(_)));
    assert_eq!(count_rows(&conn, "places"), 0);
    assert!(places_of(&conn, user.id).is_empty());
}

#[test]
fn get_missing_place_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = Uuid::new_v4();

    let err = service.get_place(id).unwrap_err();

    assert!(matches!(err, PlaceServiceError::NotFound(NotFoundTarget::Place(found)) if found == id));
}

#[test]
fn list_by_owner_returns_exactly_owned_places_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_user(&conn, "owner@example.com");
    let other = new_user(&conn, "other@example.com");
    let service = service(&conn);

    let first = service.create_place(&cafe(owner.id)).unwrap();
    service.create_place(&cafe(other.id)).unwrap();
    let second = service
        .create_place(&NewPlace {
            title: "Library".to_string(),
            ..cafe(owner.id)
        })
        .unwrap();

    let places = service.list_places_by_owner(owner.id).unwrap();

    let ids: Vec<_> = places.iter().map(|place| place.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(places.iter().all(|place| place.creator == owner.id));
}

#[test]
fn list_by_owner_distinguishes_missing_user_from_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let user = new_user(&conn, "u1@example.com");
    let service = service(&conn);

    let empty = service.list_places_by_owner(user.id).unwrap_err();
    assert!(matches!(
        empty,
        PlaceServiceError::NotFound(NotFoundTarget::PlacesForUser(id)) if id == user.id
    ));

    let missing_id = Uuid::new_v4();
    let missing = service.list_places_by_owner(missing_id).unwrap_err();
    assert!(matches!(
        missing,
        PlaceServiceError::NotFound(NotFoundTarget::User(id)) if id == missing_id
    ));
}

#[test]
fn update_changes_only_title_and_description() {
    let conn = open_db_in_memory().unwrap();
    let user = new_user(&conn, "u1@example.com");
    let service = service(&conn);
    let created = service.create_place(&cafe(user.id)).unwrap();

    let updated = service
        .update_place(
            created.id,
            &PlaceUpdate {
                title: "Tea House".to_string(),
                description: "Green tea".to_string(),
            },
        )
        .unwrap();
    let loaded = service.get_place(created.id).unwrap();

    assert_eq!(updated, loaded);
    assert_eq!(loaded.title, "Tea House");
    assert_eq!(loaded.description, "Green tea");
    assert_eq!(loaded.creator, created.creator);
    assert_eq!(loaded.location, created.location);
    assert_eq!(loaded.address, created.address);
    assert_eq!(places_of(&conn, user.id), vec![created.id]);
}

#[test]
fn update_missing_place_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .update_place(
            Uuid::new_v4(),
            &PlaceUpdate {
                title: "Tea House".to_string(),
                description: "Green tea".to_string(),
            },
        )
        .unwrap_err();

    assert!(matches!(err, PlaceServiceError::NotFound(NotFoundTarget::Place(_))));
}

#[test]
fn update_save_failure_is_store_unavailable_and_keeps_stored_fields() {
    let conn = open_db_in_memory().unwrap();
    let user = new_user(&conn, "u1@example.com");
    let service = service(&conn);
    let created = service.create_place(&cafe(user.id)).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER fail_update BEFORE UPDATE ON places
         BEGIN SELECT RAISE(ABORT, 'injected update failure'); END;",
    )
    .unwrap();

    let err = service
        .update_place(
            created.id,
            &PlaceUpdate {
                title: "Tea House".to_string(),
                description: "Green tea".to_string(),
            },
        )
        .unwrap_err();

    assert!(matches!(
        err,
        PlaceServiceError::StoreUnavailable {
            operation: PlaceOperation::Update,
            ..
        }
    ));
    let loaded = service.get_place(created.id).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.title, "Cafe");
}

#[test]
fn delete_removes_place_and_back_reference() {
    let conn = open_db_in_memory().unwrap();
    let user = new_user(&conn, "u1@example.com");
    let service = service(&conn);
    let kept = service.create_place(&cafe(user.id)).unwrap();
    let doomed = service.create_place(&cafe(user.id)).unwrap();

    service.delete_place(doomed.id).unwrap();

    assert!(matches!(
        service.get_place(doomed.id).unwrap_err(),
        PlaceServiceError::NotFound(NotFoundTarget::Place(_))
    ));
    assert_eq!(places_of(&conn, user.id), vec![kept.id]);
}

#[test]
fn delete_missing_place_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.delete_place(Uuid::new_v4()).unwrap_err();

    assert!(matches!(err, PlaceServiceError::NotFound(NotFoundTarget::Place(_))));
}

#[test]
fn lookup_failures_surface_as_store_unavailable() {
    let conn = open_db_in_memory().unwrap();
    let user = new_user(&conn, "u1@example.com");
    let service = service(&conn);
    let place = service.create_place(&cafe(user.id)).unwrap();

    conn.execute_batch("ALTER TABLE places RENAME TO places_moved;")
        .unwrap();

    let update = service
        .update_place(
            place.id,
            &PlaceUpdate {
                title: "Tea House".to_string(),
                description: "Green tea".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(update, PlaceServiceError::StoreUnavailable { .. }));

    let delete = service.delete_place(place.id).unwrap_err();
    assert!(matches!(delete, PlaceServiceError::StoreUnavailable { .. }));

    let get = service.get_place(place.id).unwrap_err();
    assert!(matches!(get, PlaceServiceError::StoreUnavailable { .. }));
}
