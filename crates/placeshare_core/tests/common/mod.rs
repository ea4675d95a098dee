#![allow(dead_code)]

use placeshare_core::{NewPlace, NewUser, SqliteEntityStore, User, UserId, UserRepository};
use rusqlite::Connection;

pub fn new_user(conn: &Connection, email: &str) -> User {
    let store = SqliteEntityStore::try_new(conn).unwrap();
    store
        .create_user(&NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            image: "https://example.com/avatar.png".to_string(),
        })
        .unwrap()
}

pub fn cafe(creator: UserId) -> NewPlace {
    NewPlace {
        title: "Cafe".to_string(),
        description: "Coffee".to_string(),
        address: "1 Main St".to_string(),
        creator,
    }
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
