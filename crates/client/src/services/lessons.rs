use lms_admin_shared::{
    ApiError, CreateLessonRequest, Lesson, LessonFilter, LessonList, LessonOrder,
    MessageResponse, Page, ReorderLessonsRequest, UpdateLessonRequest,
};

use super::ListBody;
use crate::api_client::{segment, ApiClient};

impl ApiClient {
    /// `GET /api/lessons/`; the paginated envelope is returned as-is.
    pub async fn get_all_lessons(&self, filter: &LessonFilter) -> Result<Page<Lesson>, ApiError> {
        self.get_json_with_query("/api/lessons/", filter).await
    }

    /// `GET /api/courses/:id/lessons`. The service has answered with
    /// `{lessons}`, `{items}` and a bare array over time; all are accepted.
    pub async fn get_lessons_by_course(&self, course_id: &str) -> Result<LessonList, ApiError> {
        let body: ListBody<Lesson> = self
            .get_json(&format!("/api/courses/{}/lessons", segment(course_id)))
            .await?;
        Ok(LessonList {
            lessons: body.into_items(),
        })
    }

    pub async fn get_lesson(&self, lesson_id: &str) -> Result<Lesson, ApiError> {
        self.get_json(&format!("/api/lessons/{}", segment(lesson_id))).await
    }

    pub async fn create_lesson(&self, payload: &CreateLessonRequest) -> Result<Lesson, ApiError> {
        self.post_json("/api/lessons/", payload).await
    }

    pub async fn update_lesson(
        &self,
        lesson_id: &str,
        payload: &UpdateLessonRequest,
    ) -> Result<Lesson, ApiError> {
        self.put_json(&format!("/api/lessons/{}", segment(lesson_id)), payload)
            .await
    }

    pub async fn delete_lesson(&self, lesson_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/lessons/{}", segment(lesson_id))).await
    }

    pub async fn assign_lesson_to_course(
        &self,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        let path = format!(
            "/api/courses/{}/lessons/{}/assign",
            segment(course_id),
            segment(lesson_id)
        );
        let resp: Option<MessageResponse> = self.post_empty(&path).await?;
        Ok(resp.unwrap_or_default())
    }

    pub async fn reorder_lessons(
        &self,
        course_id: &str,
        items: Vec<LessonOrder>,
    ) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/courses/{}/lessons/reorder", segment(course_id));
        let resp: Option<MessageResponse> =
            self.put_json(&path, &ReorderLessonsRequest { items }).await?;
        Ok(resp.unwrap_or_default())
    }
}
