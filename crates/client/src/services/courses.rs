use lms_admin_shared::{
    ApiError, Course, CourseList, CreateCourseRequest, UpdateCourseRequest,
};

use super::ListBody;
use crate::api_client::{segment, ApiClient};

/// Page size requested for the course list; the screens do not paginate.
const COURSE_PAGE_SIZE: u32 = 50;

impl ApiClient {
    /// `GET /api/courses/`, with the `items` envelope exposed as `courses`.
    pub async fn get_courses(&self) -> Result<CourseList, ApiError> {
        let body: ListBody<Course> = self
            .get_json_with_query("/api/courses/", &[("size", COURSE_PAGE_SIZE)])
            .await?;
        let courses = body.into_items();
        crate::log_debug!("fetched {} courses", courses.len());
        Ok(CourseList { courses })
    }

    pub async fn get_course(&self, course_id: &str) -> Result<Course, ApiError> {
        self.get_json(&format!("/api/courses/{}", segment(course_id))).await
    }

    pub async fn create_course(&self, payload: &CreateCourseRequest) -> Result<Course, ApiError> {
        self.post_json("/api/courses/", payload).await
    }

    pub async fn update_course(
        &self,
        course_id: &str,
        payload: &UpdateCourseRequest,
    ) -> Result<Course, ApiError> {
        self.put_json(&format!("/api/courses/{}", segment(course_id)), payload)
            .await
    }

    pub async fn delete_course(&self, course_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/courses/{}", segment(course_id))).await
    }
}
