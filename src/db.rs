use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio::runtime::Runtime;

use crate::{
    models::{GeneratedPlan, Suggestion, WorkoutSession},
    storage::{Store, StoreError},
    types::UserProfile,
};

pub type DB = SqlitePool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    key  TEXT PRIMARY KEY,
    body TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workouts (
    seq  INTEGER PRIMARY KEY AUTOINCREMENT,
    id   TEXT NOT NULL,
    body TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS suggestions (
    seq     INTEGER PRIMARY KEY AUTOINCREMENT,
    id      TEXT NOT NULL UNIQUE,
    body    TEXT NOT NULL,
    applied INTEGER NOT NULL DEFAULT 0
);
"#;

const PLAN_KEY: &str = "plan";
const PROFILE_KEY: &str = "profile";
const ACTIVE_SESSION_KEY: &str = "active_session";

pub async fn open(path: &Path) -> Result<DB, sqlx::Error> {
    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    Ok(pool)
}

/// SQLite-backed [`Store`]. Owns a single-threaded runtime so every call
/// completes before it returns.
pub struct SqliteStore {
    pool: DB,
    rt: Runtime,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let pool = rt.block_on(open(path))?;

        tracing::debug!(path = %path.display(), "opened store");
        Ok(Self { pool, rt })
    }

    fn load_document<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let body: Option<String> = self.rt.block_on(
            sqlx::query_scalar("SELECT body FROM documents WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool),
        )?;

        body.map(|b| serde_json::from_str(&b)).transpose().map_err(Into::into)
    }

    fn save_document<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let body = serde_json::to_string(value)?;
        self.rt.block_on(
            sqlx::query(
                "INSERT INTO documents (key, body) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET body = excluded.body",
            )
            .bind(key)
            .bind(body)
            .execute(&self.pool),
        )?;
        Ok(())
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        self.rt.block_on(self.pool.close());
    }
}

impl Store for SqliteStore {
    fn load_plan(&self) -> Result<Option<GeneratedPlan>, StoreError> {
        self.load_document(PLAN_KEY)
    }

    fn save_plan(&self, plan: &GeneratedPlan) -> Result<(), StoreError> {
        self.save_document(PLAN_KEY, plan)
    }

    fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        self.load_document(PROFILE_KEY)
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.save_document(PROFILE_KEY, profile)
    }

    fn load_workout_history(&self) -> Result<Vec<WorkoutSession>, StoreError> {
        let bodies: Vec<String> = self.rt.block_on(
            sqlx::query_scalar("SELECT body FROM workouts ORDER BY seq").fetch_all(&self.pool),
        )?;

        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(Into::into))
            .collect()
    }

    fn append_workout(&self, session: &WorkoutSession) -> Result<(), StoreError> {
        let body = serde_json::to_string(session)?;
        self.rt.block_on(
            sqlx::query("INSERT INTO workouts (id, body) VALUES (?1, ?2)")
                .bind(&session.id)
                .bind(body)
                .execute(&self.pool),
        )?;
        Ok(())
    }

    fn load_suggestions(&self) -> Result<Vec<Suggestion>, StoreError> {
        let rows = self.rt.block_on(
            sqlx::query("SELECT body, applied FROM suggestions ORDER BY seq").fetch_all(&self.pool),
        )?;

        rows.iter()
            .map(|r| -> Result<Suggestion, StoreError> {
                let mut s: Suggestion = serde_json::from_str(r.get::<&str, _>("body"))?;
                s.applied = r.get::<i64, _>("applied") != 0;
                Ok(s)
            })
            .collect()
    }

    fn append_suggestion(&self, suggestion: &Suggestion) -> Result<(), StoreError> {
        let body = serde_json::to_string(suggestion)?;
        self.rt.block_on(
            sqlx::query("INSERT INTO suggestions (id, body, applied) VALUES (?1, ?2, ?3)")
                .bind(&suggestion.id)
                .bind(body)
                .bind(suggestion.applied)
                .execute(&self.pool),
        )?;
        Ok(())
    }

    fn mark_suggestion_applied(&self, id: &str) -> Result<bool, StoreError> {
        let res = self.rt.block_on(
            sqlx::query("UPDATE suggestions SET applied = 1 WHERE id = ? AND applied = 0")
                .bind(id)
                .execute(&self.pool),
        )?;
        Ok(res.rows_affected() == 1)
    }

    fn load_active_session(&self) -> Result<Option<WorkoutSession>, StoreError> {
        self.load_document(ACTIVE_SESSION_KEY)
    }

    fn save_active_session(&self, session: &WorkoutSession) -> Result<(), StoreError> {
        self.save_document(ACTIVE_SESSION_KEY, session)
    }

    fn clear_active_session(&self) -> Result<(), StoreError> {
        self.rt.block_on(
            sqlx::query("DELETE FROM documents WHERE key = ?")
                .bind(ACTIVE_SESSION_KEY)
                .execute(&self.pool),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{SuggestionKind, VolumeChange},
        plan::generate_plan,
        storage::fixtures::*,
        types::{ExperienceLevel, FocusArea, Goal, MetabolismType, Rir, SplitPreference},
    };
    use chrono::NaiveDate;

    fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("data").join("apex.db")).unwrap();
        (dir, store)
    }

    fn profile() -> UserProfile {
        UserProfile {
            goal: Goal::LoseWeight,
            experience_level: ExperienceLevel::Beginner,
            metabolism_type: MetabolismType::Fast,
            days_per_week: 4,
            split_preference: SplitPreference::AiDecide,
            focus_areas: [FocusArea::Glutes, FocusArea::Mobility].into_iter().collect(),
        }
    }

    #[test]
    fn empty_database_reads_as_absent() {
        let (_dir, store) = store();
        assert!(store.load_plan().unwrap().is_none());
        assert!(store.load_profile().unwrap().is_none());
        assert!(store.load_workout_history().unwrap().is_empty());
        assert!(store.load_suggestions().unwrap().is_empty());
        assert!(store.load_active_session().unwrap().is_none());
    }

    #[test]
    fn profile_and_plan_round_trip_and_overwrite() {
        let (_dir, store) = store();
        let p = profile();
        let plan = generate_plan(&p);

        store.save_profile(&p).unwrap();
        store.save_plan(&plan).unwrap();
        assert_eq!(store.load_profile().unwrap(), Some(p.clone()));
        assert_eq!(store.load_plan().unwrap(), Some(plan));

        let mut other = p;
        other.split_preference = SplitPreference::ArnoldSplit;
        let regenerated = generate_plan(&other);
        store.save_plan(&regenerated).unwrap();
        assert_eq!(store.load_plan().unwrap(), Some(regenerated));
    }

    #[test]
    fn workouts_keep_insertion_order() {
        let (_dir, store) = store();
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let first = session("push-1", day, vec![set("ex-1", 185.0, 2, at(day, 18))]);
        let second = session("pull-1", day, vec![set("ex-6", 315.0, 1, at(day, 19))]);

        store.append_workout(&first).unwrap();
        store.append_workout(&second).unwrap();

        let history = store.load_workout_history().unwrap();
        assert_eq!(history, vec![first, second]);
    }

    #[test]
    fn suggestions_are_marked_in_place() {
        let (_dir, store) = store();
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let s = Suggestion {
            id: "volume-abc".into(),
            exercise_id: "ex-7".into(),
            exercise_name: "Lat Pulldown".into(),
            kind: SuggestionKind::Volume {
                change: VolumeChange::AddSet,
            },
            reason: "too easy".into(),
            timestamp: at(day, 20),
            applied: false,
        };
        store.append_suggestion(&s).unwrap();

        assert!(store.mark_suggestion_applied("volume-abc").unwrap());
        assert!(!store.mark_suggestion_applied("volume-abc").unwrap());
        assert!(!store.mark_suggestion_applied("nope").unwrap());

        let all = store.load_suggestions().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].applied);
        assert_eq!(all[0].kind, s.kind);
    }

    #[test]
    fn active_session_can_be_cleared() {
        let (_dir, store) = store();
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let mut active = session("legs-1", day, vec![]);
        active.completed = false;

        store.save_active_session(&active).unwrap();
        assert_eq!(store.load_active_session().unwrap(), Some(active));

        store.clear_active_session().unwrap();
        assert!(store.load_active_session().unwrap().is_none());
    }

    #[test]
    fn active_session_with_logged_sets_reloads() {
        let (_dir, store) = store();
        let plan = generate_plan(&profile());
        let day = &plan.days[0];
        let ex = day.exercises.iter().find(|e| e.sets >= 2).unwrap();
        let now = at(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 18);

        let mut active = WorkoutSession::start(day, now);
        assert!(active.log_set(day, &ex.id, f64::INFINITY, 5, Rir::new(2), now).is_err());
        active.log_set(day, &ex.id, 0.0, 12, Rir::new(3), now).unwrap();
        active.log_set(day, &ex.id, 62.5, 10, Rir::new(1), now).unwrap();
        store.save_active_session(&active).unwrap();

        let loaded = store.load_active_session().unwrap().unwrap();
        assert_eq!(loaded, active);
        assert_eq!(loaded.sets.len(), 2);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apex.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.save_profile(&profile()).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load_profile().unwrap(), Some(profile()));
    }
}
