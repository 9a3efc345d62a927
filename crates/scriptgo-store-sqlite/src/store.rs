//! [`SqliteStore`]: the SQLite implementation of [`ScriptStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use scriptgo_core::{
  account::{Account, NewAccount, StoredAccount},
  content::ScriptContent,
  script::{NewScript, Script, ScriptBrief, ScriptListing, ScriptUpdate},
  store::{Access, ScriptStore},
};

use crate::{
  encode::{
    RawAccount, RawScript, decode_uuid, encode_dt, encode_framework, encode_uuid,
  },
  schema::{EXPECTED_SCRIPT_COLUMNS, SCHEMA},
  Error, Result,
};

const SELECT_ACCOUNT: &str =
  "SELECT user_id, email, full_name, password_hash, created_at FROM accounts";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ScriptGo store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Column values bound by INSERT and UPDATE statements.
struct ScriptColumns {
  title:           String,
  content:         String,
  platform:        String,
  topic:           String,
  tone:            String,
  length:          String,
  language:        String,
  framework:       &'static str,
  target_audience: Option<String>,
  calendar_days:   i64,
}

impl ScriptColumns {
  fn new(
    title: String,
    content: &ScriptContent,
    brief: ScriptBrief,
  ) -> Result<Self> {
    Ok(Self {
      title,
      content:         content.encode_stored()?,
      platform:        brief.platform,
      topic:           brief.topic,
      tone:            brief.tone,
      length:          brief.length,
      language:        brief.language,
      framework:       encode_framework(brief.framework),
      target_audience: brief.target_audience,
      calendar_days:   i64::from(brief.calendar_days),
    })
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run arbitrary SQL against the connection.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The stored owner of a script, or `None` if no such script exists.
  async fn script_owner(&self, id: Uuid) -> Result<Option<Uuid>> {
    let id_str = encode_uuid(id);

    let owner: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id FROM scripts WHERE id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?)
      })
      .await?;

    owner.as_deref().map(decode_uuid).transpose()
  }

  /// Fetch a script by id regardless of owner.
  async fn fetch_script(&self, id: Uuid) -> Result<Option<Script>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawScript> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare("SELECT * FROM scripts WHERE id = ?1")?;
        let present = column_names(&stmt);
        Ok(
          stmt
            .query_row(rusqlite::params![id_str], |row| {
              RawScript::from_row(row, &present)
            })
            .optional()?,
        )
      })
      .await?;

    raw.map(RawScript::into_script).transpose()
  }
}

fn column_names(stmt: &rusqlite::Statement<'_>) -> Vec<String> {
  stmt.column_names().into_iter().map(str::to_owned).collect()
}

// ─── ScriptStore impl ────────────────────────────────────────────────────────

impl ScriptStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_account(&self, input: NewAccount) -> Result<Account> {
    let account = Account {
      user_id:    Uuid::new_v4(),
      email:      input.email.trim().to_owned(),
      full_name:  input.full_name,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(account.user_id);
    let email     = account.email.clone();
    let full_name = account.full_name.clone();
    let hash      = input.password_hash;
    let at_str    = encode_dt(account.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO accounts (user_id, email, full_name, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, full_name, hash, at_str],
        );
        match result {
          Ok(_) => Ok(true),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::EmailTaken(account.email));
    }
    Ok(account)
  }

  async fn find_account_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> Result<Option<StoredAccount>> {
    let email = email.trim().to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{SELECT_ACCOUNT} WHERE email = ?1"),
            rusqlite::params![email],
            |row| {
              Ok(RawAccount {
                user_id:       row.get(0)?,
                email:         row.get(1)?,
                full_name:     row.get(2)?,
                password_hash: row.get(3)?,
                created_at:    row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_stored).transpose()
  }

  // ── Scripts ───────────────────────────────────────────────────────────────

  async fn create_script(&self, input: NewScript) -> Result<Script> {
    let now = Utc::now();
    let script = Script {
      id:         Uuid::new_v4(),
      user_id:    input.user_id,
      title:      input.title,
      content:    input.content,
      brief:      input.brief,
      created_at: now,
      updated_at: now,
    };

    let cols    = ScriptColumns::new(script.title.clone(), &script.content, script.brief.clone())?;
    let id_str  = encode_uuid(script.id);
    let uid_str = encode_uuid(script.user_id);
    let at_str  = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO scripts (
             id, user_id, title, content, platform, topic, tone, length,
             language, framework, target_audience, calendar_days,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
          rusqlite::params![
            id_str,
            uid_str,
            cols.title,
            cols.content,
            cols.platform,
            cols.topic,
            cols.tone,
            cols.length,
            cols.language,
            cols.framework,
            cols.target_audience,
            cols.calendar_days,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(script)
  }

  async fn update_script(
    &self,
    id:     Uuid,
    owner:  Uuid,
    update: ScriptUpdate,
  ) -> Result<Access<Script>> {
    match Access::check(self.script_owner(id).await?, owner) {
      Access::Granted(()) => {}
      Access::NotFound => return Ok(Access::NotFound),
      Access::Denied => return Ok(Access::Denied),
    }

    let cols      = ScriptColumns::new(update.title, &update.content, update.brief)?;
    let id_str    = encode_uuid(id);
    let owner_str = encode_uuid(owner);
    let at_str    = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE scripts SET
             title = ?3, content = ?4, platform = ?5, topic = ?6, tone = ?7,
             length = ?8, language = ?9, framework = ?10,
             target_audience = ?11, calendar_days = ?12, updated_at = ?13
           WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![
            id_str,
            owner_str,
            cols.title,
            cols.content,
            cols.platform,
            cols.topic,
            cols.tone,
            cols.length,
            cols.language,
            cols.framework,
            cols.target_audience,
            cols.calendar_days,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    // A concurrent delete between the check and the update reads as missing.
    Ok(match self.fetch_script(id).await? {
      Some(script) => Access::Granted(script),
      None => Access::NotFound,
    })
  }

  async fn get_script(&self, id: Uuid, owner: Uuid) -> Result<Access<Script>> {
    let Some(script) = self.fetch_script(id).await? else {
      return Ok(Access::NotFound);
    };
    Ok(Access::check(Some(script.user_id), owner).map(|()| script))
  }

  async fn delete_script(&self, id: Uuid, owner: Uuid) -> Result<Access<()>> {
    let access = Access::check(self.script_owner(id).await?, owner);
    if !access.is_granted() {
      return Ok(access);
    }

    let id_str    = encode_uuid(id);
    let owner_str = encode_uuid(owner);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM scripts WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, owner_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(Access::Granted(()))
  }

  async fn list_scripts(&self, owner: Uuid) -> Result<ScriptListing> {
    let owner_str = encode_uuid(owner);

    let (present, raws): (Vec<String>, Vec<RawScript>) = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT * FROM scripts WHERE user_id = ?1 ORDER BY rowid DESC",
        )?;
        let present = column_names(&stmt);
        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| {
            RawScript::from_row(row, &present)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((present, rows))
      })
      .await?;

    let missing_columns: Vec<String> = if raws.is_empty() {
      Vec::new()
    } else {
      EXPECTED_SCRIPT_COLUMNS
        .iter()
        .filter(|expected| !present.iter().any(|c| c == *expected))
        .map(|c| (*c).to_owned())
        .collect()
    };
    if !missing_columns.is_empty() {
      tracing::warn!(
        missing = ?missing_columns,
        "scripts table is missing expected columns"
      );
    }

    let mut scripts: Vec<Script> = raws
      .into_iter()
      .map(RawScript::into_script)
      .collect::<Result<_>>()?;
    // Stable: ties on `created_at` keep insertion order, newest first.
    scripts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(ScriptListing { scripts, missing_columns })
  }
}
