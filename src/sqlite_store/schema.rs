//! SQLite schema definitions for the application database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const VIDEO_FK: ForeignKey = ForeignKey {
    foreign_table: "videos",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const PLAYLIST_FK: ForeignKey = ForeignKey {
    foreign_table: "playlists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const USERS_TABLE_V1: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("username", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("full_name", &SqlType::Text, non_null = true),
        sqlite_column!("password_hash", &SqlType::Text, non_null = true),
        sqlite_column!("avatar_url", &SqlType::Text, non_null = true),
        sqlite_column!("cover_image_url", &SqlType::Text),
        sqlite_column!("refresh_token", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_users_username", "username")],
    unique_constraints: &[],
};

const VIDEOS_TABLE_V1: Table = Table {
    name: "videos",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "owner_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!("video_file", &SqlType::Text, non_null = true),
        sqlite_column!("thumbnail", &SqlType::Text),
        sqlite_column!("duration", &SqlType::Real, non_null = true),
        sqlite_column!("views", &SqlType::Integer, non_null = true, default_value = Some("0")),
        sqlite_column!(
            "is_published",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("1")
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_videos_owner", "owner_id")],
    unique_constraints: &[],
};

const COMMENTS_TABLE_V1: Table = Table {
    name: "comments",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "video_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&VIDEO_FK)
        ),
        sqlite_column!(
            "owner_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("content", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_comments_video", "video_id")],
    unique_constraints: &[],
};

/// Polymorphic like join table. The target is (target_type, target_id) since a
/// like may point at a video, a comment or a tweet; the compound unique
/// constraint makes concurrent duplicate toggles collapse into one row.
const LIKES_TABLE_V1: Table = Table {
    name: "likes",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "owner_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("target_type", &SqlType::Text, non_null = true),
        sqlite_column!("target_id", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_likes_target", "target_type, target_id")],
    unique_constraints: &[&["owner_id", "target_type", "target_id"]],
};

const SUBSCRIPTIONS_TABLE_V1: Table = Table {
    name: "subscriptions",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "channel_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!(
            "subscriber_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_subscriptions_channel", "channel_id")],
    unique_constraints: &[&["channel_id", "subscriber_id"]],
};

const PLAYLISTS_TABLE_V1: Table = Table {
    name: "playlists",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "owner_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_playlists_owner", "owner_id")],
    unique_constraints: &[],
};

const PLAYLIST_VIDEOS_TABLE_V1: Table = Table {
    name: "playlist_videos",
    columns: &[
        sqlite_column!(
            "playlist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&PLAYLIST_FK)
        ),
        sqlite_column!(
            "video_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&VIDEO_FK)
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["playlist_id", "video_id"]],
};

const TWEETS_TABLE_V1: Table = Table {
    name: "tweets",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "owner_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!("content", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_tweets_owner", "owner_id")],
    unique_constraints: &[],
};

const WATCH_HISTORY_TABLE_V1: Table = Table {
    name: "watch_history",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&USER_FK)
        ),
        sqlite_column!(
            "video_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&VIDEO_FK)
        ),
        sqlite_column!("watched_at", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_watch_history_user", "user_id")],
    unique_constraints: &[&["user_id", "video_id"]],
};

pub const APP_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[
        USERS_TABLE_V1,
        VIDEOS_TABLE_V1,
        COMMENTS_TABLE_V1,
        LIKES_TABLE_V1,
        SUBSCRIPTIONS_TABLE_V1,
        PLAYLISTS_TABLE_V1,
        PLAYLIST_VIDEOS_TABLE_V1,
        TWEETS_TABLE_V1,
        WATCH_HISTORY_TABLE_V1,
    ],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn v1_schema_creates_and_validates() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = &APP_VERSIONED_SCHEMAS[0];
        schema.create(&conn).unwrap();
        schema.validate(&conn).unwrap();
    }

    #[test]
    fn likes_unique_constraint_created() {
        let conn = Connection::open_in_memory().unwrap();
        APP_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute(
            "INSERT INTO users (id, username, email, full_name, password_hash, avatar_url)
             VALUES ('u1', 'alice', 'alice@x.com', 'Alice', 'hash', '/media/a')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO likes (id, owner_id, target_type, target_id) VALUES ('l1', 'u1', 'video', 'v1')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO likes (id, owner_id, target_type, target_id) VALUES ('l2', 'u1', 'video', 'v1')",
            [],
        );
        assert!(duplicate.is_err());
    }
}
