use lms_admin_shared::{
    ApiError, Course, CourseList, CreateCourseRequest, UpdateCourseRequest, Validate,
};

use super::cached;
use crate::app::AppContext;
use crate::query_keys;
use crate::roles::RoleGate;

/// Course list and course editing.
#[derive(Debug, Clone)]
pub struct CoursesPage {
    app: AppContext,
}

impl CoursesPage {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    pub async fn load(&self) -> Result<Vec<Course>, ApiError> {
        let list: CourseList =
            cached(&self.app, query_keys::courses(), |c| async move { c.get_courses().await }).await?;
        Ok(list.courses)
    }

    pub async fn get(&self, course_id: &str) -> Result<Course, ApiError> {
        let id = course_id.to_string();
        cached(&self.app, query_keys::course(course_id), move |c| {
            let id = id.clone();
            async move { c.get_course(&id).await }
        })
        .await
    }

    pub fn can_edit(&self) -> bool {
        RoleGate::teacher_or_admin().allows(self.app.role().as_deref())
    }

    /// Create a course; a blank instructor defaults to the signed-in user.
    pub async fn create(&self, mut payload: CreateCourseRequest) -> Result<Course, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        if payload.instructor_id.trim().is_empty() {
            payload.instructor_id = self.app.current_user()?.id.to_string();
        }
        payload.validate()?;
        self.app
            .queries
            .mutate(self.app.client().create_course(&payload), &[query_keys::courses()])
            .await
    }

    pub async fn update(&self, course_id: &str, payload: UpdateCourseRequest) -> Result<Course, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.validate()?;
        self.app
            .queries
            .mutate(
                self.app.client().update_course(course_id, &payload),
                &[query_keys::courses(), query_keys::course(course_id)],
            )
            .await
    }

    pub async fn delete(&self, course_id: &str) -> Result<(), ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        self.app
            .queries
            .mutate(
                self.app.client().delete_course(course_id),
                &[
                    query_keys::courses(),
                    query_keys::course(course_id),
                    query_keys::lessons(course_id),
                ],
            )
            .await
    }
}
