use lms_admin_shared::{
    ApiError, CreateLessonRequest, Lesson, LessonFilter, LessonList, LessonOrder,
    MessageResponse, Page, UpdateLessonRequest, Validate,
};

use super::{append_position, cached};
use crate::app::AppContext;
use crate::query::QueryKey;
use crate::query_keys;
use crate::roles::RoleGate;

/// Lessons of one course, plus the cross-course lesson library.
#[derive(Debug, Clone)]
pub struct LessonsPage {
    app: AppContext,
    course_id: String,
}

impl LessonsPage {
    pub fn new(app: AppContext, course_id: impl Into<String>) -> Self {
        Self {
            app,
            course_id: course_id.into(),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn key(&self) -> QueryKey {
        query_keys::lessons(&self.course_id)
    }

    fn stale_keys(&self) -> [QueryKey; 3] {
        [
            self.key(),
            query_keys::all_lessons(),
            query_keys::course(&self.course_id),
        ]
    }

    /// Lessons of the course, in order.
    pub async fn load(&self) -> Result<Vec<Lesson>, ApiError> {
        let id = self.course_id.clone();
        let list: LessonList = cached(&self.app, self.key(), move |c| {
            let id = id.clone();
            async move { c.get_lessons_by_course(&id).await }
        })
        .await?;
        let mut lessons = list.lessons;
        lessons.sort_by_key(|l| l.order);
        Ok(lessons)
    }

    /// One page of the lesson library.
    pub async fn load_all(&self, filter: LessonFilter) -> Result<Page<Lesson>, ApiError> {
        let key = query_keys::all_lessons()
            .with(filter.search.clone())
            .with(filter.course_id.clone())
            .with(filter.page.map(i64::from))
            .with(filter.size.map(i64::from));
        cached(&self.app, key, move |c| {
            let filter = filter.clone();
            async move { c.get_all_lessons(&filter).await }
        })
        .await
    }

    /// Create a lesson in this course. An `order_index` of 0 means "append".
    pub async fn create(&self, mut payload: CreateLessonRequest) -> Result<Lesson, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.course_id = self.course_id.clone();
        payload.validate()?;
        if payload.order_index == 0 {
            payload.order_index = match self.load().await {
                Ok(lessons) => append_position(lessons.len()),
                Err(_) => 1,
            };
        }
        self.app
            .queries
            .mutate(self.app.client().create_lesson(&payload), &self.stale_keys())
            .await
    }

    pub async fn update(&self, lesson_id: &str, payload: UpdateLessonRequest) -> Result<Lesson, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.validate()?;
        self.app
            .queries
            .mutate(
                self.app.client().update_lesson(lesson_id, &payload),
                &self.stale_keys(),
            )
            .await
    }

    pub async fn delete(&self, lesson_id: &str) -> Result<(), ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        self.app
            .queries
            .mutate(self.app.client().delete_lesson(lesson_id), &self.stale_keys())
            .await
    }

    /// Attach an existing library lesson to this course.
    pub async fn assign(&self, lesson_id: &str) -> Result<MessageResponse, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        self.app
            .queries
            .mutate(
                self.app
                    .client()
                    .assign_lesson_to_course(&self.course_id, lesson_id),
                &self.stale_keys(),
            )
            .await
    }

    /// Persist a new order: the first id becomes order 1.
    pub async fn reorder(&self, lesson_ids: &[String]) -> Result<MessageResponse, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        let items = lesson_ids
            .iter()
            .zip(1u32..)
            .map(|(id, order)| LessonOrder {
                id: id.clone(),
                order,
            })
            .collect();
        self.app
            .queries
            .mutate(
                self.app.client().reorder_lessons(&self.course_id, items),
                &[self.key()],
            )
            .await
    }
}
