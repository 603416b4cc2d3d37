//! Database operations for the user directory and friendships
//!
//! Friendships are stored as two rows, one per direction, so "friends of X"
//! is a single indexed lookup on `user_id`.

use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::shared::UserSummary;

/// Verified users other than `user_id`
pub async fn list_verified_users(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<Sqlite, UserSummary>(
        r#"
        SELECT id, first_name, last_name
        FROM users
        WHERE verified = 1 AND id != $1
        ORDER BY first_name, last_name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Verified users who are neither `user_id` nor one of their friends
pub async fn list_non_friends(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<Sqlite, UserSummary>(
        r#"
        SELECT id, first_name, last_name
        FROM users
        WHERE verified = 1
          AND id != $1
          AND id NOT IN (SELECT friend_id FROM friendships WHERE user_id = $1)
        ORDER BY first_name, last_name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Friends of `user_id`
pub async fn list_friends(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<Sqlite, UserSummary>(
        r#"
        SELECT u.id, u.first_name, u.last_name
        FROM friendships f
        JOIN users u ON u.id = f.friend_id
        WHERE f.user_id = $1
        ORDER BY f.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn are_friends(pool: &SqlitePool, a: Uuid, b: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM friendships WHERE user_id = $1 AND friend_id = $2",
    )
    .bind(a)
    .bind(b)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Record a friendship in both directions
///
/// Takes a connection so callers can run it inside a transaction.
pub async fn add_friendship(
    conn: &mut SqliteConnection,
    a: Uuid,
    b: Uuid,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    for (user_id, friend_id) in [(a, b), (b, a)] {
        sqlx::query(
            "INSERT OR IGNORE INTO friendships (user_id, friend_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(friend_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::{create_user, mark_verified, set_otp, NewUser};
    use crate::backend::server::config::load_database;

    async fn user(pool: &SqlitePool, first_name: &str, verified: bool) -> Uuid {
        let user = create_user(
            pool,
            NewUser {
                first_name: first_name.to_string(),
                last_name: "Test".to_string(),
                email: format!("{}@example.com", first_name.to_lowercase()),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap();
        if verified {
            set_otp(pool, user.id, "otp-hash", chrono::Utc::now() + chrono::Duration::minutes(10))
                .await
                .unwrap();
            assert!(mark_verified(pool, user.id, "otp-hash").await.unwrap());
        }
        user.id
    }

    #[tokio::test]
    async fn test_directory_listings() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        let ada = user(&pool, "Ada", true).await;
        let bob = user(&pool, "Bob", true).await;
        let cy = user(&pool, "Cy", true).await;
        let _dee = user(&pool, "Dee", false).await;

        let all = list_verified_users(&pool, ada).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![bob, cy]);

        let mut conn = pool.acquire().await.unwrap();
        add_friendship(&mut conn, ada, bob).await.unwrap();
        drop(conn);

        assert!(are_friends(&pool, ada, bob).await.unwrap());
        assert!(are_friends(&pool, bob, ada).await.unwrap());
        assert!(!are_friends(&pool, ada, cy).await.unwrap());

        let others: Vec<Uuid> = list_non_friends(&pool, ada)
            .await
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(others, vec![cy]);

        let friends = list_friends(&pool, bob).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].first_name, "Ada");
    }

    #[tokio::test]
    async fn test_add_friendship_is_idempotent() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        let ada = user(&pool, "Ada", true).await;
        let bob = user(&pool, "Bob", true).await;

        let mut conn = pool.acquire().await.unwrap();
        add_friendship(&mut conn, ada, bob).await.unwrap();
        add_friendship(&mut conn, bob, ada).await.unwrap();
        drop(conn);

        assert_eq!(list_friends(&pool, ada).await.unwrap().len(), 1);
    }
}
