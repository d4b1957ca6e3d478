use chrono::NaiveDateTime;
use diesel::dsl::{exists, sql};
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::sqlite::Sqlite;

use crate::data::db::fold_case;
use crate::data::models::{
    CreateWordRequest, NewWord, SrsChangeset, UpdateWordRequest, Word, WordChangeset, WordError,
    WordFilter,
};
use crate::schema::words;
use crate::srs;

diesel::define_sql_function! {
    /// SQLite `RANDOM()`, used to shuffle rows that tie on the sort key.
    fn random() -> Integer;
}

/// Owner-scoped persistence of vocabulary words and their review state.
///
/// Every lookup filters on both `word_id` and `user_id`, so a word owned by
/// someone else is indistinguishable from a missing one.
pub struct WordRepository;

impl WordRepository {
    pub fn create(
        conn: &mut SqliteConnection,
        user_id: i32,
        request: &CreateWordRequest,
        now: NaiveDateTime,
    ) -> Result<Word, WordError> {
        conn.immediate_transaction::<_, WordError, _>(|conn| {
            if Self::exists_for_user(conn, user_id, &request.term)? {
                return Err(WordError::Duplicate(request.term.clone()));
            }

            diesel::insert_into(words::table)
                .values(&NewWord::new(user_id, request, now))
                .execute(conn)?;

            let word_id = diesel::select(sql::<Integer>("last_insert_rowid()"))
                .get_result::<i32>(conn)?;

            Self::get(conn, word_id, user_id)?.ok_or(WordError::NotFound)
        })
    }

    pub fn get(
        conn: &mut SqliteConnection,
        word_id: i32,
        user_id: i32,
    ) -> Result<Option<Word>, diesel::result::Error> {
        words::table
            .filter(words::word_id.eq(word_id))
            .filter(words::user_id.eq(user_id))
            .select(Word::as_select())
            .first(conn)
            .optional()
    }

    /// Newest first, paginated.
    pub fn list(
        conn: &mut SqliteConnection,
        user_id: i32,
        filter: &WordFilter,
    ) -> Result<Vec<Word>, diesel::result::Error> {
        Self::filtered(user_id, filter)
            .order((words::created_at.desc(), words::word_id.desc()))
            .offset(filter.skip)
            .limit(filter.limit)
            .select(Word::as_select())
            .load(conn)
    }

    /// Number of words matching `filter`, ignoring its pagination.
    pub fn count(
        conn: &mut SqliteConnection,
        user_id: i32,
        filter: &WordFilter,
    ) -> Result<i64, diesel::result::Error> {
        Self::filtered(user_id, filter).count().get_result(conn)
    }

    pub fn update(
        conn: &mut SqliteConnection,
        word_id: i32,
        user_id: i32,
        request: &UpdateWordRequest,
    ) -> Result<Option<Word>, WordError> {
        conn.immediate_transaction::<_, WordError, _>(|conn| {
            let Some(existing) = Self::get(conn, word_id, user_id)? else {
                return Ok(None);
            };

            if let Some(term) = &request.term {
                let renamed = existing.term.to_lowercase() != term.to_lowercase();
                if renamed && Self::exists_for_user(conn, user_id, term)? {
                    return Err(WordError::Duplicate(term.clone()));
                }
            }

            let changes = WordChangeset::from(request);
            diesel::update(
                words::table
                    .filter(words::word_id.eq(word_id))
                    .filter(words::user_id.eq(user_id)),
            )
            .set((&changes, words::version.eq(words::version + 1)))
            .execute(conn)?;

            Ok(Self::get(conn, word_id, user_id)?)
        })
    }

    /// Returns `false` when there was nothing to delete.
    pub fn delete(
        conn: &mut SqliteConnection,
        word_id: i32,
        user_id: i32,
    ) -> Result<bool, diesel::result::Error> {
        let deleted = diesel::delete(
            words::table
                .filter(words::word_id.eq(word_id))
                .filter(words::user_id.eq(user_id)),
        )
        .execute(conn)?;
        Ok(deleted > 0)
    }

    /// Case-insensitive check for an existing term.
    pub fn exists_for_user(
        conn: &mut SqliteConnection,
        user_id: i32,
        term: &str,
    ) -> Result<bool, diesel::result::Error> {
        // SQLite's lower() only folds ASCII, so compare in Rust.
        let needle = term.trim().to_lowercase();
        let terms = words::table
            .filter(words::user_id.eq(user_id))
            .select(words::term)
            .load::<String>(conn)?;
        Ok(terms.iter().any(|t| t.trim().to_lowercase() == needle))
    }

    /// Up to `limit` words whose review is due at `now`.
    ///
    /// Words without a due date come first, then the most overdue; words
    /// sharing a due date are returned in random order.
    pub fn due_words(
        conn: &mut SqliteConnection,
        user_id: i32,
        limit: i64,
        now: NaiveDateTime,
    ) -> Result<Vec<Word>, diesel::result::Error> {
        // SQLite sorts NULL before any value in ascending order.
        words::table
            .filter(words::user_id.eq(user_id))
            .filter(
                words::next_review_at
                    .is_null()
                    .or(words::next_review_at.le(now)),
            )
            .order((words::next_review_at.asc(), random()))
            .limit(limit)
            .select(Word::as_select())
            .load(conn)
    }

    /// Words outside `exclude`, least mastered first with ties shuffled.
    pub fn lowest_mastery(
        conn: &mut SqliteConnection,
        user_id: i32,
        exclude: &[i32],
        limit: i64,
    ) -> Result<Vec<Word>, diesel::result::Error> {
        words::table
            .filter(words::user_id.eq(user_id))
            .filter(words::word_id.ne_all(exclude))
            .order((words::mastery_score.asc(), random()))
            .limit(limit)
            .select(Word::as_select())
            .load(conn)
    }

    pub fn count_due(
        conn: &mut SqliteConnection,
        user_id: i32,
        now: NaiveDateTime,
    ) -> Result<i64, diesel::result::Error> {
        words::table
            .filter(words::user_id.eq(user_id))
            .filter(
                words::next_review_at
                    .is_null()
                    .or(words::next_review_at.le(now)),
            )
            .count()
            .get_result(conn)
    }

    /// Runs the scheduler on `snapshot` and writes the result, provided the
    /// stored row still carries the snapshot's version.
    ///
    /// Returns `Ok(None)` when the snapshot is stale; nothing is written then.
    pub fn apply_review(
        conn: &mut SqliteConnection,
        snapshot: &Word,
        correct: bool,
        now: NaiveDateTime,
    ) -> Result<Option<Word>, WordError> {
        let next = srs::process_review(&snapshot.srs_state(), correct, now);

        let updated = diesel::update(
            words::table
                .filter(words::word_id.eq(snapshot.word_id))
                .filter(words::user_id.eq(snapshot.user_id))
                .filter(words::version.eq(snapshot.version)),
        )
        .set(&SrsChangeset::new(&next, snapshot.version.wrapping_add(1)))
        .execute(conn)?;

        if updated == 0 {
            return Ok(None);
        }

        log::debug!(
            "Reviewed word {} (correct={}): streak {} -> {}, ease {:.2} -> {:.2}, due {:?}",
            snapshot.word_id,
            correct,
            snapshot.correct_streak,
            next.correct_streak,
            snapshot.ease_factor,
            next.ease_factor,
            next.next_review_at
        );

        Ok(Self::get(conn, snapshot.word_id, snapshot.user_id)?)
    }

    /// Loads the word, schedules it and persists the new state.
    ///
    /// The immediate transaction takes SQLite's write lock before the read,
    /// so concurrent reviews of one word run one after the other and each sees
    /// the previous result. A write from a stale snapshot is still refused by
    /// the version guard in [`Self::apply_review`] and surfaces as
    /// [`WordError::Conflict`].
    pub fn record_review(
        conn: &mut SqliteConnection,
        word_id: i32,
        user_id: i32,
        correct: bool,
        now: NaiveDateTime,
    ) -> Result<Word, WordError> {
        conn.immediate_transaction::<_, WordError, _>(|conn| {
            let snapshot = Self::get(conn, word_id, user_id)?.ok_or(WordError::NotFound)?;
            Self::apply_review(conn, &snapshot, correct, now)?.ok_or_else(|| {
                log::warn!("Stale snapshot while reviewing word {}", word_id);
                WordError::Conflict
            })
        })
    }

    fn filtered(user_id: i32, filter: &WordFilter) -> words::BoxedQuery<'static, Sqlite> {
        let mut query = words::table
            .filter(words::user_id.eq(user_id))
            .into_boxed();

        if let Some(part_of_speech) = filter.part_of_speech {
            query = query.filter(words::part_of_speech.eq(part_of_speech.as_str()));
        }
        if let Some(cefr_level) = filter.cefr_level {
            query = query.filter(words::cefr_level.eq(cefr_level.as_str()));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            query = query.filter(
                fold_case(words::term)
                    .like(pattern.clone())
                    .escape('\\')
                    .or(fold_case(words::translation).like(pattern).escape('\\')),
            );
        }

        query
    }

    /// Whether any row exists for this owner; used by drills to short-circuit.
    pub fn has_words(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<bool, diesel::result::Error> {
        diesel::select(exists(words::table.filter(words::user_id.eq(user_id)))).get_result(conn)
    }
}

/// Makes `%`, `_` and the escape character match literally in a LIKE pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
