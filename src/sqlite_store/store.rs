//! SQLite-backed implementation of the user and content store traits.

use super::schema::APP_VERSIONED_SCHEMAS;
use crate::content_store::{
    ChannelStats, Comment, CommentWithOwner, ContentStore, Like, LikeTarget, Page, Playlist,
    PlaylistWithVideos, Subscription, Tweet, UserSummary, Video, VideoQuery, VideoUpdate,
    VideoWithOwner,
};
use crate::sqlite_persistence::BASE_DB_VERSION;
use crate::user::{AccountUpdate, ChannelProfile, NewUser, PublicUser, User, UserStore};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

const USER_COLS: &str =
    "id, username, email, full_name, password_hash, avatar_url, cover_image_url, refresh_token, created";

const VIDEO_COLS: &str = "v.id, v.owner_id, v.title, v.description, v.video_file, v.thumbnail, \
     v.duration, v.views, v.is_published, v.created";

const OWNER_COLS: &str = "u.id, u.username, u.full_name, u.avatar_url";

/// Returns true if the error chain contains a SQLite unique-constraint failure.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<rusqlite::Error>())
        .any(sqlite_unique_violation)
}

fn sqlite_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let conn = Connection::open(path).context("Failed to open application database")?;
        conn.execute("PRAGMA foreign_keys = ON;", [])?;

        let schema = APP_VERSIONED_SCHEMAS.last().unwrap();
        if is_new_db {
            info!("Creating new application database at {:?}", path);
            schema.create(&conn)?;
        } else {
            let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
            let db_version = raw_version - BASE_DB_VERSION as i64;
            if db_version != schema.version as i64 {
                bail!(
                    "Application database version {} does not match expected version {}",
                    db_version,
                    schema.version
                );
            }
            schema
                .validate(&conn)
                .context("Application database schema validation failed")?;
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        APP_VERSIONED_SCHEMAS.last().unwrap().create(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        full_name: row.get(3)?,
        password_hash: row.get(4)?,
        avatar_url: row.get(5)?,
        cover_image_url: row.get(6)?,
        refresh_token: row.get(7)?,
        created: row.get(8)?,
    })
}

fn row_to_video(row: &rusqlite::Row) -> rusqlite::Result<Video> {
    Ok(Video {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        video_file: row.get(4)?,
        thumbnail: row.get(5)?,
        duration: row.get(6)?,
        views: row.get::<_, i64>(7)? as u64,
        is_published: row.get::<_, i64>(8)? != 0,
        created: row.get(9)?,
    })
}

fn row_to_video_with_owner(row: &rusqlite::Row) -> rusqlite::Result<VideoWithOwner> {
    Ok(VideoWithOwner {
        video: row_to_video(row)?,
        owner: UserSummary {
            id: row.get(10)?,
            username: row.get(11)?,
            full_name: row.get(12)?,
            avatar: row.get(13)?,
        },
    })
}

fn row_to_like(row: &rusqlite::Row) -> rusqlite::Result<Like> {
    Ok(Like {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        target_type: row.get(2)?,
        target_id: row.get(3)?,
        created: row.get(4)?,
    })
}

fn row_to_user_summary(row: &rusqlite::Row) -> rusqlite::Result<UserSummary> {
    Ok(UserSummary {
        id: row.get(0)?,
        username: row.get(1)?,
        full_name: row.get(2)?,
        avatar: row.get(3)?,
    })
}

impl UserStore for SqliteStore {
    fn create_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, username, email, full_name, password_hash, avatar_url, cover_image_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id,
                user.username,
                user.email,
                user.full_name,
                user.password_hash,
                user.avatar_url,
                user.cover_image_url,
            ],
        )?;
        let created = conn.query_row(
            &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
            params![user.id],
            row_to_user,
        )?;
        Ok(created)
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
                params![user_id],
                row_to_user,
            )
            .optional()?)
    }

    fn get_user_by_handle(&self, handle: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!("SELECT {USER_COLS} FROM users WHERE username = ?1 OR email = ?1"),
                params![handle],
                row_to_user,
            )
            .optional()?)
    }

    fn username_or_email_exists(&self, username: &str, email: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 OR email = ?2)",
            params![username, email],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn set_refresh_token(&self, user_id: &str, refresh_token: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET refresh_token = ?2 WHERE id = ?1",
            params![user_id, refresh_token],
        )?;
        Ok(())
    }

    fn set_password_hash(&self, user_id: &str, password_hash: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET password_hash = ?2 WHERE id = ?1",
            params![user_id, password_hash],
        )?;
        Ok(())
    }

    fn update_account(&self, user_id: &str, update: &AccountUpdate) -> Result<Option<User>> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE users SET full_name = COALESCE(?2, full_name), email = COALESCE(?3, email)
                 WHERE id = ?1",
                params![user_id, update.full_name, update.email],
            )?;
        }
        self.get_user(user_id)
    }

    fn set_avatar(&self, user_id: &str, avatar_url: &str) -> Result<Option<User>> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE users SET avatar_url = ?2 WHERE id = ?1",
                params![user_id, avatar_url],
            )?;
        }
        self.get_user(user_id)
    }

    fn set_cover_image(&self, user_id: &str, cover_image_url: &str) -> Result<Option<User>> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE users SET cover_image_url = ?2 WHERE id = ?1",
                params![user_id, cover_image_url],
            )?;
        }
        self.get_user(user_id)
    }

    fn channel_profile(
        &self,
        username: &str,
        viewer_id: Option<&str>,
    ) -> Result<Option<ChannelProfile>> {
        let conn = self.conn.lock().unwrap();
        let profile = conn
            .query_row(
                "SELECT u.id, u.username, u.email, u.full_name, u.avatar_url, u.cover_image_url, u.created,
                    (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id),
                    (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id),
                    EXISTS(SELECT 1 FROM subscriptions s WHERE s.channel_id = u.id AND s.subscriber_id = ?2)
                 FROM users u WHERE u.username = ?1",
                params![username, viewer_id],
                |row| {
                    Ok(ChannelProfile {
                        user: PublicUser {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            email: row.get(2)?,
                            full_name: row.get(3)?,
                            avatar: row.get(4)?,
                            cover_image: row.get(5)?,
                            created_at: row.get(6)?,
                        },
                        subscribers_count: row.get::<_, i64>(7)? as u64,
                        channels_subscribed_to_count: row.get::<_, i64>(8)? as u64,
                        is_subscribed: row.get(9)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }
}

impl ContentStore for SqliteStore {
    fn create_video(&self, video: &Video) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO videos (id, owner_id, title, description, video_file, thumbnail, duration, views, is_published, created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                video.id,
                video.owner_id,
                video.title,
                video.description,
                video.video_file,
                video.thumbnail,
                video.duration,
                video.views as i64,
                video.is_published as i64,
                video.created,
            ],
        )?;
        Ok(())
    }

    fn get_video(&self, video_id: &str) -> Result<Option<Video>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!("SELECT {VIDEO_COLS} FROM videos v WHERE v.id = ?1"),
                params![video_id],
                row_to_video,
            )
            .optional()?)
    }

    fn get_video_with_owner(&self, video_id: &str) -> Result<Option<VideoWithOwner>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {VIDEO_COLS}, {OWNER_COLS} FROM videos v
                     JOIN users u ON u.id = v.owner_id WHERE v.id = ?1"
                ),
                params![video_id],
                row_to_video_with_owner,
            )
            .optional()?)
    }

    fn list_videos(&self, query: &VideoQuery) -> Result<Page<VideoWithOwner>> {
        let conn = self.conn.lock().unwrap();

        let mut clauses: Vec<String> = Vec::new();
        let mut bind_values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(owner_id) = &query.owner_id {
            bind_values.push(Box::new(owner_id.clone()));
            clauses.push(format!("v.owner_id = ?{}", bind_values.len()));
            if !query.include_unpublished {
                clauses.push("v.is_published = 1".to_owned());
            }
        } else {
            clauses.push("v.is_published = 1".to_owned());
        }

        if let Some(text) = &query.text {
            bind_values.push(Box::new(format!("%{}%", text)));
            let n = bind_values.len();
            clauses.push(format!("(v.title LIKE ?{n} OR v.description LIKE ?{n})"));
        }

        let where_sql = format!("WHERE {}", clauses.join(" AND "));

        let total_docs: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM videos v {where_sql}"),
            rusqlite::params_from_iter(bind_values.iter().map(|v| v.as_ref())),
            |row| row.get(0),
        )?;

        let limit = query.limit.max(1);
        let page = query.page.max(1);
        let direction = if query.ascending { "ASC" } else { "DESC" };
        bind_values.push(Box::new(limit as i64));
        let limit_param = bind_values.len();
        bind_values.push(Box::new(((page - 1) * limit) as i64));
        let offset_param = bind_values.len();

        let mut stmt = conn.prepare(&format!(
            "SELECT {VIDEO_COLS}, {OWNER_COLS} FROM videos v
             JOIN users u ON u.id = v.owner_id
             {where_sql}
             ORDER BY v.{} {direction}
             LIMIT ?{limit_param} OFFSET ?{offset_param}",
            query.sort_by.column(),
        ))?;
        let docs = stmt
            .query_map(
                rusqlite::params_from_iter(bind_values.iter().map(|v| v.as_ref())),
                row_to_video_with_owner,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(docs, total_docs as u64, page, limit))
    }

    fn update_video(&self, video_id: &str, update: &VideoUpdate) -> Result<Option<Video>> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE videos SET
                    title = COALESCE(?2, title),
                    description = COALESCE(?3, description),
                    video_file = COALESCE(?4, video_file),
                    thumbnail = COALESCE(?5, thumbnail),
                    duration = COALESCE(?6, duration)
                 WHERE id = ?1",
                params![
                    video_id,
                    update.title,
                    update.description,
                    update.video_file,
                    update.thumbnail,
                    update.duration,
                ],
            )?;
        }
        self.get_video(video_id)
    }

    fn delete_video(&self, video_id: &str) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM likes WHERE target_type = 'comment'
             AND target_id IN (SELECT id FROM comments WHERE video_id = ?1)",
            params![video_id],
        )?;
        tx.execute(
            "DELETE FROM likes WHERE target_type = 'video' AND target_id = ?1",
            params![video_id],
        )?;
        tx.execute("DELETE FROM comments WHERE video_id = ?1", params![video_id])?;
        tx.execute(
            "DELETE FROM playlist_videos WHERE video_id = ?1",
            params![video_id],
        )?;
        tx.execute(
            "DELETE FROM watch_history WHERE video_id = ?1",
            params![video_id],
        )?;
        tx.execute("DELETE FROM videos WHERE id = ?1", params![video_id])?;
        tx.commit()?;
        Ok(())
    }

    fn set_video_published(&self, video_id: &str, is_published: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE videos SET is_published = ?2 WHERE id = ?1",
            params![video_id, is_published as i64],
        )?;
        Ok(())
    }

    fn increment_views(&self, video_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE videos SET views = views + 1 WHERE id = ?1",
            params![video_id],
        )?;
        Ok(())
    }

    fn record_watch(&self, user_id: &str, video_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO watch_history (user_id, video_id, watched_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, video_id) DO UPDATE SET watched_at = excluded.watched_at",
            params![user_id, video_id, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }

    fn watch_history(&self, user_id: &str) -> Result<Vec<VideoWithOwner>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {VIDEO_COLS}, {OWNER_COLS} FROM watch_history wh
             JOIN videos v ON v.id = wh.video_id
             JOIN users u ON u.id = v.owner_id
             WHERE wh.user_id = ?1
             ORDER BY wh.watched_at DESC"
        ))?;
        let videos = stmt
            .query_map(params![user_id], row_to_video_with_owner)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(videos)
    }

    fn create_comment(&self, comment: &Comment) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO comments (id, video_id, owner_id, content, created) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment.id,
                comment.video_id,
                comment.owner_id,
                comment.content,
                comment.created,
            ],
        )?;
        Ok(())
    }

    fn get_comment(&self, comment_id: &str) -> Result<Option<Comment>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id, video_id, owner_id, content, created FROM comments WHERE id = ?1",
                params![comment_id],
                |row| {
                    Ok(Comment {
                        id: row.get(0)?,
                        video_id: row.get(1)?,
                        owner_id: row.get(2)?,
                        content: row.get(3)?,
                        created: row.get(4)?,
                    })
                },
            )
            .optional()?)
    }

    fn get_comment_with_owner(&self, comment_id: &str) -> Result<Option<CommentWithOwner>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT c.id, c.video_id, c.owner_id, c.content, c.created, u.id, u.username, u.full_name, u.avatar_url
                 FROM comments c JOIN users u ON u.id = c.owner_id WHERE c.id = ?1",
                params![comment_id],
                row_to_comment_with_owner,
            )
            .optional()?)
    }

    fn comments_for_video(
        &self,
        video_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<CommentWithOwner>> {
        let conn = self.conn.lock().unwrap();
        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE video_id = ?1",
            params![video_id],
            |row| row.get(0),
        )?;

        let limit = limit.max(1);
        let page = page.max(1);
        let mut stmt = conn.prepare(
            "SELECT c.id, c.video_id, c.owner_id, c.content, c.created, u.id, u.username, u.full_name, u.avatar_url
             FROM comments c JOIN users u ON u.id = c.owner_id
             WHERE c.video_id = ?1
             ORDER BY c.created DESC
             LIMIT ?2 OFFSET ?3",
        )?;
        let docs = stmt
            .query_map(
                params![video_id, limit as i64, ((page - 1) * limit) as i64],
                row_to_comment_with_owner,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(docs, total as u64, page, limit))
    }

    fn update_comment_content(&self, comment_id: &str, content: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE comments SET content = ?2 WHERE id = ?1",
            params![comment_id, content],
        )?;
        Ok(())
    }

    fn delete_comment(&self, comment_id: &str) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM likes WHERE target_type = 'comment' AND target_id = ?1",
            params![comment_id],
        )?;
        tx.execute("DELETE FROM comments WHERE id = ?1", params![comment_id])?;
        tx.commit()?;
        Ok(())
    }

    fn toggle_like(&self, owner_id: &str, target: &LikeTarget) -> Result<Option<Like>> {
        let conn = self.conn.lock().unwrap();
        let existing_id: Option<String> = conn
            .query_row(
                "SELECT id FROM likes WHERE owner_id = ?1 AND target_type = ?2 AND target_id = ?3",
                params![owner_id, target.kind(), target.id()],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing_id {
            conn.execute("DELETE FROM likes WHERE id = ?1", params![id])?;
            return Ok(None);
        }

        let like = Like::new(owner_id, target);
        let inserted = conn.execute(
            "INSERT INTO likes (id, owner_id, target_type, target_id, created) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![like.id, like.owner_id, like.target_type, like.target_id, like.created],
        );
        match inserted {
            Ok(_) => Ok(Some(like)),
            // A concurrent toggle won the insert; report the surviving row.
            Err(err) if sqlite_unique_violation(&err) => Ok(conn
                .query_row(
                    "SELECT id, owner_id, target_type, target_id, created FROM likes
                     WHERE owner_id = ?1 AND target_type = ?2 AND target_id = ?3",
                    params![owner_id, target.kind(), target.id()],
                    row_to_like,
                )
                .optional()?),
            Err(err) => Err(err.into()),
        }
    }

    fn liked_videos(&self, owner_id: &str) -> Result<Vec<VideoWithOwner>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {VIDEO_COLS}, {OWNER_COLS} FROM likes l
             JOIN videos v ON v.id = l.target_id
             JOIN users u ON u.id = v.owner_id
             WHERE l.owner_id = ?1 AND l.target_type = 'video'
             ORDER BY l.created DESC"
        ))?;
        let videos = stmt
            .query_map(params![owner_id], row_to_video_with_owner)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(videos)
    }

    fn toggle_subscription(
        &self,
        channel_id: &str,
        subscriber_id: &str,
    ) -> Result<Option<Subscription>> {
        let conn = self.conn.lock().unwrap();
        let existing_id: Option<String> = conn
            .query_row(
                "SELECT id FROM subscriptions WHERE channel_id = ?1 AND subscriber_id = ?2",
                params![channel_id, subscriber_id],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing_id {
            conn.execute("DELETE FROM subscriptions WHERE id = ?1", params![id])?;
            return Ok(None);
        }

        let subscription = Subscription::new(channel_id, subscriber_id);
        let inserted = conn.execute(
            "INSERT INTO subscriptions (id, channel_id, subscriber_id, created) VALUES (?1, ?2, ?3, ?4)",
            params![
                subscription.id,
                subscription.channel_id,
                subscription.subscriber_id,
                subscription.created,
            ],
        );
        match inserted {
            Ok(_) => Ok(Some(subscription)),
            Err(err) if sqlite_unique_violation(&err) => Ok(conn
                .query_row(
                    "SELECT id, channel_id, subscriber_id, created FROM subscriptions
                     WHERE channel_id = ?1 AND subscriber_id = ?2",
                    params![channel_id, subscriber_id],
                    |row| {
                        Ok(Subscription {
                            id: row.get(0)?,
                            channel_id: row.get(1)?,
                            subscriber_id: row.get(2)?,
                            created: row.get(3)?,
                        })
                    },
                )
                .optional()?),
            Err(err) => Err(err.into()),
        }
    }

    fn channel_subscribers(&self, channel_id: &str) -> Result<Vec<UserSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.full_name, u.avatar_url FROM subscriptions s
             JOIN users u ON u.id = s.subscriber_id
             WHERE s.channel_id = ?1
             ORDER BY s.created DESC",
        )?;
        let subscribers = stmt
            .query_map(params![channel_id], row_to_user_summary)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(subscribers)
    }

    fn subscribed_channels(&self, subscriber_id: &str) -> Result<Vec<UserSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.full_name, u.avatar_url FROM subscriptions s
             JOIN users u ON u.id = s.channel_id
             WHERE s.subscriber_id = ?1
             ORDER BY s.created DESC",
        )?;
        let channels = stmt
            .query_map(params![subscriber_id], row_to_user_summary)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(channels)
    }

    fn create_playlist(&self, playlist: &Playlist) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO playlists (id, owner_id, name, description, created) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                playlist.id,
                playlist.owner_id,
                playlist.name,
                playlist.description,
                playlist.created,
            ],
        )?;
        Ok(())
    }

    fn get_playlist(&self, playlist_id: &str) -> Result<Option<Playlist>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id, owner_id, name, description, created FROM playlists WHERE id = ?1",
                params![playlist_id],
                row_to_playlist,
            )
            .optional()?)
    }

    fn get_playlist_with_videos(&self, playlist_id: &str) -> Result<Option<PlaylistWithVideos>> {
        let playlist = match self.get_playlist(playlist_id)? {
            Some(playlist) => playlist,
            None => return Ok(None),
        };
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {VIDEO_COLS}, {OWNER_COLS} FROM playlist_videos pv
             JOIN videos v ON v.id = pv.video_id
             JOIN users u ON u.id = v.owner_id
             WHERE pv.playlist_id = ?1
             ORDER BY pv.position ASC"
        ))?;
        let videos = stmt
            .query_map(params![playlist_id], row_to_video_with_owner)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(PlaylistWithVideos { playlist, videos }))
    }

    fn user_playlists(&self, user_id: &str) -> Result<Vec<Playlist>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, owner_id, name, description, created FROM playlists
             WHERE owner_id = ?1 ORDER BY created DESC",
        )?;
        let playlists = stmt
            .query_map(params![user_id], row_to_playlist)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(playlists)
    }

    fn update_playlist(
        &self,
        playlist_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE playlists SET name = COALESCE(?2, name), description = COALESCE(?3, description)
             WHERE id = ?1",
            params![playlist_id, name, description],
        )?;
        Ok(())
    }

    fn delete_playlist(&self, playlist_id: &str) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM playlist_videos WHERE playlist_id = ?1",
            params![playlist_id],
        )?;
        tx.execute("DELETE FROM playlists WHERE id = ?1", params![playlist_id])?;
        tx.commit()?;
        Ok(())
    }

    fn add_video_to_playlist(&self, playlist_id: &str, video_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT INTO playlist_videos (playlist_id, video_id, position)
             VALUES (?1, ?2, (SELECT COALESCE(MAX(position) + 1, 0) FROM playlist_videos WHERE playlist_id = ?1))",
            params![playlist_id, video_id],
        );
        match inserted {
            Ok(_) => Ok(true),
            Err(err) if sqlite_unique_violation(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn remove_video_from_playlist(&self, playlist_id: &str, video_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM playlist_videos WHERE playlist_id = ?1 AND video_id = ?2",
            params![playlist_id, video_id],
        )?;
        Ok(())
    }

    fn create_tweet(&self, tweet: &Tweet) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO tweets (id, owner_id, content, created) VALUES (?1, ?2, ?3, ?4)",
            params![tweet.id, tweet.owner_id, tweet.content, tweet.created],
        )?;
        Ok(())
    }

    fn get_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id, owner_id, content, created FROM tweets WHERE id = ?1",
                params![tweet_id],
                row_to_tweet,
            )
            .optional()?)
    }

    fn user_tweets(&self, user_id: &str) -> Result<Vec<Tweet>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, owner_id, content, created FROM tweets WHERE owner_id = ?1 ORDER BY created DESC",
        )?;
        let tweets = stmt
            .query_map(params![user_id], row_to_tweet)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tweets)
    }

    fn update_tweet_content(&self, tweet_id: &str, content: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE tweets SET content = ?2 WHERE id = ?1",
            params![tweet_id, content],
        )?;
        Ok(())
    }

    fn delete_tweet(&self, tweet_id: &str) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM likes WHERE target_type = 'tweet' AND target_id = ?1",
            params![tweet_id],
        )?;
        tx.execute("DELETE FROM tweets WHERE id = ?1", params![tweet_id])?;
        tx.commit()?;
        Ok(())
    }

    fn channel_stats(&self, channel_id: &str) -> Result<ChannelStats> {
        let conn = self.conn.lock().unwrap();
        let (total_videos, total_views): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(views), 0) FROM videos WHERE owner_id = ?1",
            params![channel_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let total_likes: i64 = conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE target_type = 'video'
             AND target_id IN (SELECT id FROM videos WHERE owner_id = ?1)",
            params![channel_id],
            |row| row.get(0),
        )?;
        let total_subscribers: i64 = conn.query_row(
            "SELECT COUNT(*) FROM subscriptions WHERE channel_id = ?1",
            params![channel_id],
            |row| row.get(0),
        )?;
        Ok(ChannelStats {
            total_videos: total_videos as u64,
            total_views: total_views as u64,
            total_likes: total_likes as u64,
            total_subscribers: total_subscribers as u64,
        })
    }

    fn channel_videos(&self, channel_id: &str) -> Result<(Vec<VideoWithOwner>, u64)> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {VIDEO_COLS}, {OWNER_COLS} FROM videos v
             JOIN users u ON u.id = v.owner_id
             WHERE v.owner_id = ?1
             ORDER BY v.created DESC"
        ))?;
        let videos = stmt
            .query_map(params![channel_id], row_to_video_with_owner)?
            .collect::<Result<Vec<_>, _>>()?;
        let total = videos.len() as u64;
        Ok((videos, total))
    }
}

fn row_to_comment_with_owner(row: &rusqlite::Row) -> rusqlite::Result<CommentWithOwner> {
    Ok(CommentWithOwner {
        comment: Comment {
            id: row.get(0)?,
            video_id: row.get(1)?,
            owner_id: row.get(2)?,
            content: row.get(3)?,
            created: row.get(4)?,
        },
        owner: UserSummary {
            id: row.get(5)?,
            username: row.get(6)?,
            full_name: row.get(7)?,
            avatar: row.get(8)?,
        },
    })
}

fn row_to_playlist(row: &rusqlite::Row) -> rusqlite::Result<Playlist> {
    Ok(Playlist {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created: row.get(4)?,
    })
}

fn row_to_tweet(row: &rusqlite::Row) -> rusqlite::Result<Tweet> {
    Ok(Tweet {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        content: row.get(2)?,
        created: row.get(3)?,
    })
}
