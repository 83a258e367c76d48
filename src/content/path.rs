//! Personalized learning path
//!
//! Recommends the next lessons a user has not completed at a target difficulty.
//! The ordering is deterministic (course order) but makes no claim of optimality.

use serde_json::json;

use super::reader::{ContentReader, OP_LEARNING_PATH};
use crate::backend::{RowQuery, Table};
use crate::error::Result;
use crate::models::content::UserProgress;
use crate::models::{LearningPath, Lesson};

/// Maximum number of recommended lessons
pub const LEARNING_PATH_SIZE: usize = 10;

impl ContentReader {
    pub async fn get_personalized_learning_path(
        &self,
        user_id: &str,
        target_level: i32,
    ) -> Result<LearningPath> {
        let params = json!({ "user_id": user_id, "target_level": target_level });

        self.cached(OP_LEARNING_PATH, &params, async {
            let progress: Vec<UserProgress> = self
                .fetch(
                    Table::UserProgress,
                    RowQuery::new().eq("user_id", user_id).eq("completed", true),
                )
                .await?;
            let completed_ids: Vec<_> = progress.iter().map(|p| json!(p.lesson_id)).collect();

            let at_level = RowQuery::new()
                .eq("difficulty_level", target_level)
                .active();

            let (all_at_level, recommended_lessons) = tokio::try_join!(
                self.fetch::<Lesson>(Table::Lessons, at_level.clone()),
                self.fetch::<Lesson>(
                    Table::Lessons,
                    at_level
                        .clone()
                        .not_in("id", completed_ids)
                        .order_by("order_index", true)
                        .limit(LEARNING_PATH_SIZE),
                ),
            )?;

            let total_count = all_at_level.len();
            let completed_count = all_at_level
                .iter()
                .filter(|lesson| progress.iter().any(|p| p.lesson_id == lesson.id))
                .count();

            Ok(LearningPath {
                user_id: user_id.to_string(),
                target_level,
                completion_percentage: completion_percentage(completed_count, total_count),
                estimated_total_minutes: total_minutes(&recommended_lessons),
                recommended_lessons,
                completed_count,
                total_count,
            })
        })
        .await
    }
}

/// Sum of declared durations, saturating instead of overflowing.
pub fn total_minutes(lessons: &[Lesson]) -> u32 {
    lessons
        .iter()
        .map(|l| l.estimated_duration.unwrap_or(0))
        .fold(0u32, u32::saturating_add)
}

/// `completed / total * 100`, rounded to the nearest integer; 0 for an empty level.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_percentage_rounds() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(1, 8), 13);
        assert_eq!(completion_percentage(3, 3), 100);
    }

    #[test]
    fn test_completion_percentage_empty_level() {
        assert_eq!(completion_percentage(0, 0), 0);
    }

    #[test]
    fn test_total_minutes_saturates() {
        let lessons: Vec<Lesson> = serde_json::from_value(json!([
            {"id": 1, "module_id": 1, "title": "a", "estimated_duration": u32::MAX},
            {"id": 2, "module_id": 1, "title": "b", "estimated_duration": 30},
            {"id": 3, "module_id": 1, "title": "c"}
        ]))
        .unwrap();

        assert_eq!(total_minutes(&lessons), u32::MAX);
        assert_eq!(total_minutes(&lessons[1..]), 30);
    }
}
