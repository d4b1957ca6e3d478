use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::data::repositories::WordRepository;
use crate::data::models::Word;

/// Picks the words for a drill session.
///
/// Due words are taken first (most overdue first); if there are not enough,
/// the session is topped up with the least mastered of the remaining words.
/// The final list is shuffled so the order gives nothing away.
pub fn select_drill_words<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    user_id: i32,
    count: usize,
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<Vec<Word>, diesel::result::Error> {
    if count == 0 || !WordRepository::has_words(conn, user_id)? {
        return Ok(Vec::new());
    }

    let mut selected = WordRepository::due_words(conn, user_id, count as i64, now)?;

    if selected.len() < count {
        let taken: Vec<i32> = selected.iter().map(|w| w.word_id).collect();
        let remaining = (count - selected.len()) as i64;
        selected.extend(WordRepository::lowest_mastery(conn, user_id, &taken, remaining)?);
    }

    selected.shuffle(rng);
    selected.truncate(count);
    Ok(selected)
}

/// Trimmed, case-insensitive comparison of a typed answer.
pub fn check_answer(expected: &str, answer: &str) -> bool {
    normalize(expected) == normalize(answer)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::db::run_migrations;
    use crate::data::models::{CefrLevel, CreateWordRequest, PartOfSpeech};
    use crate::schema::words;
    use chrono::{Duration, NaiveDate};
    use diesel::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 7, 1)
            .and_then(|d| d.and_hms_opt(18, 0, 0))
            .unwrap()
    }

    fn seeded_conn(terms: &[&str]) -> (SqliteConnection, Vec<Word>) {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        run_migrations(&mut conn).unwrap();
        let words = terms
            .iter()
            .map(|term| {
                let request = CreateWordRequest {
                    term: term.to_string(),
                    translation: format!("{term}-en"),
                    part_of_speech: PartOfSpeech::Noun,
                    gender: None,
                    cefr_level: CefrLevel::A1,
                };
                WordRepository::create(&mut conn, 1, &request, now()).unwrap()
            })
            .collect();
        (conn, words)
    }

    fn schedule(conn: &mut SqliteConnection, word: &Word, due: NaiveDateTime, mastery: i32) {
        diesel::update(words::table.filter(words::word_id.eq(word.word_id)))
            .set((
                words::next_review_at.eq(Some(due)),
                words::mastery_score.eq(mastery),
            ))
            .execute(conn)
            .unwrap();
    }

    #[test]
    fn empty_store_gives_empty_session() {
        let (mut conn, _) = seeded_conn(&[]);
        let mut rng = StdRng::seed_from_u64(7);
        let words = select_drill_words(&mut conn, 1, 10, now(), &mut rng).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn due_words_are_preferred() {
        let (mut conn, words) = seeded_conn(&["a", "b", "c", "d"]);
        let later = now() + Duration::days(5);
        schedule(&mut conn, &words[0], later, 0);
        schedule(&mut conn, &words[1], later, 0);

        let mut rng = StdRng::seed_from_u64(7);
        let mut ids: Vec<i32> = select_drill_words(&mut conn, 1, 2, now(), &mut rng)
            .unwrap()
            .iter()
            .map(|w| w.word_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![words[2].word_id, words[3].word_id]);
    }

    #[test]
    fn shortfall_is_filled_by_lowest_mastery() {
        let (mut conn, words) = seeded_conn(&["a", "b", "c", "d"]);
        let later = now() + Duration::days(5);
        schedule(&mut conn, &words[0], later, 900);
        schedule(&mut conn, &words[1], later, 150);
        schedule(&mut conn, &words[2], later, 400);

        let mut rng = StdRng::seed_from_u64(11);
        let mut ids: Vec<i32> = select_drill_words(&mut conn, 1, 3, now(), &mut rng)
            .unwrap()
            .iter()
            .map(|w| w.word_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![words[1].word_id, words[2].word_id, words[3].word_id]);
    }

    #[test]
    fn session_never_exceeds_available_words() {
        let (mut conn, _) = seeded_conn(&["a", "b"]);
        let mut rng = StdRng::seed_from_u64(3);
        let words = select_drill_words(&mut conn, 1, 10, now(), &mut rng).unwrap();
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn answers_ignore_case_and_padding() {
        assert!(check_answer("House", "  house "));
        assert!(check_answer("ČAŠA", "čaša"));
        assert!(!check_answer("house", "home"));
    }
}
