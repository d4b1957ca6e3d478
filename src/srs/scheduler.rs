// scheduler.rs
//! SM-2 derived review scheduler.
//!
//! Every answer is binarised into an SM-2 quality: a correct answer is a
//! perfect recall (5), a wrong one a failed recall (1). Qualities 0, 2, 3
//! and 4 are never produced. The ease factor follows the classic SM-2
//! update, while the interval is recomputed from the current streak on
//! every review instead of being carried over from the previous one.

use chrono::{Duration, NaiveDateTime};

use super::state::{MAX_MASTERY_SCORE, MIN_EASE_FACTOR, SrsState};

pub const QUALITY_CORRECT: u8 = 5;
pub const QUALITY_FAILED: u8 = 1;

/// Interval used for a failed review and the first correct one.
pub const MIN_INTERVAL_DAYS: f64 = 1.0;
pub const SECOND_INTERVAL_DAYS: f64 = 6.0;
pub const MAX_INTERVAL_DAYS: f64 = 365.0;

/// Reviews needed before the success rate counts at full weight.
const EXPERIENCE_REVIEWS: i64 = 10;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub fn quality_for(correct: bool) -> u8 {
    if correct { QUALITY_CORRECT } else { QUALITY_FAILED }
}

/// `EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored at 1.3.
pub fn updated_ease_factor(ease_factor: f64, quality: u8) -> f64 {
    let penalty = f64::from(5u8.saturating_sub(quality.min(5)));
    let next = ease_factor + (0.1 - penalty * (0.08 + penalty * 0.02));
    next.max(MIN_EASE_FACTOR)
}

/// Lifetime success rate on a 0..=1000 scale, dampened over the first ten
/// reviews so a single lucky answer cannot read as mastery.
///
/// `floor(min(1000, rate * 1000 * min(1, total / 10)))`, evaluated in
/// integers so results such as 9/10 land exactly on 900.
pub fn mastery_score(correct_count: i32, wrong_count: i32) -> i32 {
    let correct = i64::from(correct_count.max(0));
    let total = correct + i64::from(wrong_count.max(0));
    if total == 0 {
        return 0;
    }

    let experience = total.min(EXPERIENCE_REVIEWS);
    let score = correct * 1000 * experience / (total * EXPERIENCE_REVIEWS);
    score.clamp(0, i64::from(MAX_MASTERY_SCORE)) as i32
}

/// Days until the next review after a correct answer.
///
/// Streaks of one and two give the fixed SM-2 steps of 1 and 6 days; each
/// further step multiplies by the ease factor, capped at a year.
pub fn calculate_interval(correct_streak: i32, ease_factor: f64) -> f64 {
    match correct_streak {
        s if s <= 1 => MIN_INTERVAL_DAYS,
        2 => SECOND_INTERVAL_DAYS,
        s => {
            let mut interval = SECOND_INTERVAL_DAYS;
            for _ in 0..(s - 2) {
                interval *= ease_factor;
                // ease factor is >= 1.3, so the sequence only grows
                if interval >= MAX_INTERVAL_DAYS {
                    break;
                }
            }
            interval.min(MAX_INTERVAL_DAYS)
        }
    }
}

/// Applies one answer to `state` and returns the complete next state.
///
/// Pure: the same snapshot, outcome and `now` always give the same result.
/// A malformed snapshot (negative counters, ease factor below the floor) is
/// clamped rather than rejected.
pub fn process_review(state: &SrsState, correct: bool, now: NaiveDateTime) -> SrsState {
    let prior = state.sanitized();
    let quality = quality_for(correct);

    let (correct_count, wrong_count, correct_streak) = if correct {
        (
            prior.correct_count.saturating_add(1),
            prior.wrong_count,
            prior.correct_streak.saturating_add(1),
        )
    } else {
        (prior.correct_count, prior.wrong_count.saturating_add(1), 0)
    };

    let ease_factor = updated_ease_factor(prior.ease_factor, quality);

    let interval_days = if correct {
        calculate_interval(correct_streak, ease_factor)
    } else {
        MIN_INTERVAL_DAYS
    };

    SrsState {
        mastery_score: mastery_score(correct_count, wrong_count),
        ease_factor,
        correct_count,
        wrong_count,
        correct_streak,
        next_review_at: Some(now + interval_duration(interval_days)),
        last_reviewed_at: Some(now),
    }
}

fn interval_duration(days: f64) -> Duration {
    Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::state::{INITIAL_EASE_FACTOR, MasteryBand};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 4)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .unwrap()
    }

    fn fresh() -> SrsState {
        SrsState::new(now())
    }

    fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
        (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    #[test]
    fn quality_mapping_is_binary() {
        assert_eq!(quality_for(true), 5);
        assert_eq!(quality_for(false), 1);
    }

    #[test]
    fn ease_factor_steps() {
        assert!((updated_ease_factor(2.5, QUALITY_CORRECT) - 2.6).abs() < EPS);
        assert!((updated_ease_factor(2.5, QUALITY_FAILED) - 1.96).abs() < EPS);
        assert_eq!(updated_ease_factor(1.5, QUALITY_FAILED), MIN_EASE_FACTOR);
    }

    #[test]
    fn first_correct_review_of_new_item() {
        let next = process_review(&fresh(), true, now());

        assert_eq!(next.correct_count, 1);
        assert_eq!(next.wrong_count, 0);
        assert_eq!(next.correct_streak, 1);
        assert_eq!(next.mastery_score, 100);
        assert!((next.ease_factor - 2.6).abs() < EPS);
        assert_eq!(next.next_review_at, Some(now() + Duration::days(1)));
        assert_eq!(next.last_reviewed_at, Some(now()));
    }

    #[test]
    fn first_wrong_review_of_new_item() {
        let next = process_review(&fresh(), false, now());

        assert_eq!(next.correct_count, 0);
        assert_eq!(next.wrong_count, 1);
        assert_eq!(next.correct_streak, 0);
        assert_eq!(next.mastery_score, 0);
        assert!((next.ease_factor - 1.96).abs() < EPS);
        assert_eq!(next.next_review_at, Some(now() + Duration::days(1)));
    }

    #[test]
    fn interval_steps() {
        assert_eq!(calculate_interval(0, 2.5), 1.0);
        assert_eq!(calculate_interval(1, 2.5), 1.0);
        assert_eq!(calculate_interval(2, 2.5), 6.0);
        assert!((calculate_interval(3, 2.0) - 12.0).abs() < EPS);
        assert_eq!(calculate_interval(10, 2.5), MAX_INTERVAL_DAYS);
        assert_eq!(calculate_interval(i32::MAX, 1.3), MAX_INTERVAL_DAYS);
    }

    #[test]
    fn third_correct_uses_updated_ease_factor() {
        let state = SrsState {
            ease_factor: 2.0,
            correct_count: 2,
            correct_streak: 2,
            ..fresh()
        };
        let next = process_review(&state, true, now());

        assert_eq!(next.correct_streak, 3);
        assert!((next.ease_factor - 2.1).abs() < EPS);
        let days = days_between(now(), next.next_review_at.unwrap());
        assert!((days - 12.6).abs() < 1e-6);
    }

    #[test]
    fn long_streak_is_capped_at_a_year() {
        let state = SrsState {
            ease_factor: 2.5,
            correct_count: 9,
            correct_streak: 9,
            ..fresh()
        };
        let next = process_review(&state, true, now());
        assert_eq!(next.next_review_at, Some(now() + Duration::days(365)));
    }

    #[test]
    fn wrong_answer_resets_streak_and_interval() {
        let state = SrsState {
            ease_factor: 3.0,
            correct_count: 8,
            correct_streak: 8,
            ..fresh()
        };
        let next = process_review(&state, false, now());

        assert_eq!(next.correct_streak, 0);
        assert_eq!(next.wrong_count, 1);
        assert_eq!(next.next_review_at, Some(now() + Duration::days(1)));
    }

    #[test]
    fn mastery_is_dampened_by_experience() {
        assert_eq!(mastery_score(0, 0), 0);
        assert_eq!(mastery_score(1, 0), 100);
        assert_eq!(mastery_score(9, 1), 900);
        assert_eq!(mastery_score(10, 0), 1000);
        assert_eq!(mastery_score(40, 0), 1000);
        assert_eq!(mastery_score(2, 1), 200);
        assert_eq!(mastery_score(0, 12), 0);
    }

    #[test]
    fn negative_counters_are_clamped() {
        let state = SrsState {
            correct_count: -5,
            wrong_count: -2,
            correct_streak: -1,
            ease_factor: 0.2,
            ..fresh()
        };
        let next = process_review(&state, true, now());

        assert_eq!(next.correct_count, 1);
        assert_eq!(next.wrong_count, 0);
        assert_eq!(next.correct_streak, 1);
        assert!((next.ease_factor - 1.4).abs() < EPS);
    }

    #[test]
    fn twelve_correct_reviews_from_fresh() {
        let mut state = fresh();
        let mut clock = now();
        let mut previous_ease = state.ease_factor;
        let mut intervals = Vec::new();

        for review in 1..=12 {
            state = process_review(&state, true, clock);
            assert!(state.ease_factor > previous_ease);
            previous_ease = state.ease_factor;

            let due = state.next_review_at.unwrap();
            intervals.push(days_between(clock, due));
            if review >= 10 {
                assert_eq!(state.mastery_score, 1000);
            } else {
                assert_eq!(state.mastery_score, review * 100);
            }
            clock = due;
        }

        assert_eq!(state.correct_streak, 12);
        assert_eq!(state.correct_count, 12);
        assert!((state.ease_factor - (INITIAL_EASE_FACTOR + 1.2)).abs() < 1e-6);
        assert_eq!(state.band(), MasteryBand::Mastered);

        assert!((intervals[0] - 1.0).abs() < 1e-6);
        assert!((intervals[1] - 6.0).abs() < 1e-6);
        for pair in intervals.windows(2).skip(1) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(intervals[2] > intervals[1] * 2.0);
        assert!((intervals[11] - MAX_INTERVAL_DAYS).abs() < 1e-6);
        assert!((intervals[10] - MAX_INTERVAL_DAYS).abs() < 1e-6);
    }

    fn arb_state() -> impl Strategy<Value = SrsState> {
        (
            0..=1000i32,
            1.3f64..5.0,
            0..500i32,
            0..500i32,
            0..500i32,
            proptest::option::of(-1_000_000i64..1_000_000),
        )
            .prop_map(|(mastery, ease, correct, wrong, streak, offset)| SrsState {
                mastery_score: mastery,
                ease_factor: ease,
                correct_count: correct,
                wrong_count: wrong,
                correct_streak: streak.min(correct),
                next_review_at: offset.map(|s| now() + Duration::seconds(s)),
                last_reviewed_at: None,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn ease_factor_never_below_floor(state in arb_state(), correct in any::<bool>()) {
            let next = process_review(&state, correct, now());
            prop_assert!(next.ease_factor >= MIN_EASE_FACTOR);
        }

        #[test]
        fn mastery_stays_in_range(state in arb_state(), correct in any::<bool>()) {
            let next = process_review(&state, correct, now());
            prop_assert!((0..=MAX_MASTERY_SCORE).contains(&next.mastery_score));
        }

        #[test]
        fn streak_follows_outcome(state in arb_state(), correct in any::<bool>()) {
            let next = process_review(&state, correct, now());
            if correct {
                prop_assert_eq!(next.correct_streak, state.correct_streak + 1);
            } else {
                prop_assert_eq!(next.correct_streak, 0);
            }
        }

        #[test]
        fn counters_never_decrease(state in arb_state(), correct in any::<bool>()) {
            let next = process_review(&state, correct, now());
            prop_assert!(next.correct_count >= state.correct_count);
            prop_assert!(next.wrong_count >= state.wrong_count);
            prop_assert_eq!(next.total_reviews(), state.total_reviews() + 1);
        }

        #[test]
        fn next_review_at_least_a_day_out(state in arb_state(), correct in any::<bool>()) {
            let next = process_review(&state, correct, now());
            let reviewed = next.last_reviewed_at.unwrap();
            let due = next.next_review_at.unwrap();
            prop_assert_eq!(reviewed, now());
            prop_assert!(due - reviewed >= Duration::days(1));
            prop_assert!(due - reviewed <= Duration::days(365));
        }

        #[test]
        fn identical_inputs_give_identical_output(state in arb_state(), correct in any::<bool>()) {
            let a = process_review(&state, correct, now());
            let b = process_review(&state, correct, now());
            prop_assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }
}
