use futures_util::future::try_join3;
use lms_admin_shared::{
    ApiError, Assignment, AssignmentFilter, AssignmentList, AssignmentStatus, Course, CourseList,
    CreateAssignmentRequest, Deck, DeckList, Role, UpdateAssignmentRequest, User, UserFilter,
    UserListResponse, Validate,
};

use super::cached;
use crate::app::AppContext;
use crate::query::QueryKey;
use crate::query_keys;
use crate::roles::{RoleGate, RolePermission};

/// Choices offered by the "new assignment" form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssignmentFormOptions {
    pub students: Vec<User>,
    pub courses: Vec<Course>,
    pub decks: Vec<Deck>,
}

/// Assignment list and lifecycle.
#[derive(Debug, Clone)]
pub struct AssignmentsPage {
    app: AppContext,
}

impl AssignmentsPage {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    pub fn key(&self, page: u32) -> QueryKey {
        query_keys::assignments(self.app.role().as_deref(), self.app.user_id()).with(i64::from(page))
    }

    /// Teachers see what they assigned, students what they were given,
    /// admins everything.
    fn filter(&self, page: u32) -> AssignmentFilter {
        let perms = RolePermission::from_auth(&self.app.auth);
        let me = self.app.user_id();
        AssignmentFilter {
            page: page.max(1),
            size: self.app.config.items_per_page.max(1),
            student_id: if perms.is_student() { me } else { None },
            instructor_id: if perms.is_teacher() { me } else { None },
        }
    }

    pub async fn load(&self, page: u32) -> Result<AssignmentList, ApiError> {
        self.app.current_user()?;
        let filter = self.filter(page);
        cached(&self.app, self.key(page), move |c| {
            let filter = filter.clone();
            async move { c.get_assignments(&filter).await }
        })
        .await
    }

    pub async fn get(&self, assignment_id: i64) -> Result<Assignment, ApiError> {
        cached(&self.app, query_keys::assignment(assignment_id), move |c| async move {
            c.get_assignment(assignment_id).await
        })
        .await
    }

    /// Students, courses and decks for the create form, fetched together.
    pub async fn form_options(&self) -> Result<AssignmentFormOptions, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        let admin = RolePermission::from_auth(&self.app.auth).is_admin();
        let students_key = if admin {
            query_keys::users(Some(Role::Student.as_str()))
        } else {
            query_keys::my_students()
        };

        let students = cached(&self.app, students_key, move |c| async move {
            if admin {
                c.get_users(&UserFilter {
                    role: Some(Role::Student),
                    ..Default::default()
                })
                .await
            } else {
                c.get_my_students(&UserFilter::default()).await
            }
        });
        let courses = cached(&self.app, query_keys::courses(), |c| async move { c.get_courses().await });
        let decks = cached(
            &self.app,
            query_keys::decks(self.app.role().as_deref(), self.app.user_id()),
            |c| async move { c.get_decks().await },
        );

        let (students, courses, decks): (UserListResponse, CourseList, DeckList) =
            try_join3(students, courses, decks).await?;
        Ok(AssignmentFormOptions {
            students: students.users,
            courses: courses.courses,
            decks: decks.decks,
        })
    }

    /// Assign content to a student on behalf of the signed-in teacher.
    pub async fn create(&self, mut payload: CreateAssignmentRequest) -> Result<Assignment, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.instructor_id = self.app.current_user()?.id;
        payload.validate()?;
        self.app
            .queries
            .mutate(
                self.app.client().create_assignment(&payload),
                &[query_keys::assignments_root()],
            )
            .await
    }

    pub async fn update(
        &self,
        assignment_id: i64,
        payload: UpdateAssignmentRequest,
    ) -> Result<Assignment, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.validate()?;
        self.app
            .queries
            .mutate(
                self.app.client().update_assignment(assignment_id, &payload),
                &[
                    query_keys::assignments_root(),
                    query_keys::assignment(assignment_id),
                ],
            )
            .await
    }

    /// Any signed-in role may move an assignment along; students mark their
    /// own work in progress or completed.
    pub async fn update_status(
        &self,
        assignment_id: i64,
        status: AssignmentStatus,
    ) -> Result<Assignment, ApiError> {
        self.app.current_user()?;
        self.app
            .queries
            .mutate(
                self.app.client().update_assignment_status(assignment_id, status),
                &[
                    query_keys::assignments_root(),
                    query_keys::assignment(assignment_id),
                ],
            )
            .await
    }

    pub async fn delete(&self, assignment_id: i64) -> Result<(), ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        self.app
            .queries
            .mutate(
                self.app.client().delete_assignment(assignment_id),
                &[
                    query_keys::assignments_root(),
                    query_keys::assignment(assignment_id),
                ],
            )
            .await
    }
}
