use lms_admin_shared::{
    ApiError, CreateUserRequest, FieldError, Role, UpdateUserRequest, User, UserFilter,
    UserListResponse, Validate, ValidationErrors,
};

use super::cached;
use crate::app::AppContext;
use crate::query::QueryKey;
use crate::query_keys;
use crate::roles::{RoleGate, RolePermission};

/// User management. Admins see every account, teachers only the students
/// they created.
#[derive(Debug, Clone)]
pub struct UsersPage {
    app: AppContext,
}

impl UsersPage {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    fn permissions(&self) -> RolePermission {
        RolePermission::from_auth(&self.app.auth)
    }

    pub fn key(&self) -> QueryKey {
        if self.permissions().is_admin() {
            query_keys::users(self.app.role().as_deref())
        } else {
            query_keys::my_students()
        }
    }

    pub async fn load(&self) -> Result<Vec<User>, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        let admin = self.permissions().is_admin();
        let list: UserListResponse = cached(&self.app, self.key(), move |c| async move {
            if admin {
                c.get_users(&UserFilter::default()).await
            } else {
                c.get_my_students(&UserFilter::default()).await
            }
        })
        .await?;
        Ok(list.users)
    }

    /// Roles the signed-in user may hand out.
    pub fn assignable_roles(&self) -> Vec<Role> {
        if self.permissions().is_admin() {
            vec![Role::Student, Role::Teacher, Role::Admin]
        } else if self.permissions().is_teacher() {
            vec![Role::Student]
        } else {
            Vec::new()
        }
    }

    fn check_role(&self, role: Role) -> Result<(), ApiError> {
        if self.assignable_roles().contains(&role) {
            return Ok(());
        }
        let mut errors = ValidationErrors::default();
        errors.push(FieldError::new(
            "role",
            format!("you cannot assign the {role} role"),
        ));
        Err(errors.into())
    }

    fn stale_keys() -> [QueryKey; 2] {
        [query_keys::users_root(), query_keys::my_students()]
    }

    pub async fn create(&self, payload: CreateUserRequest) -> Result<User, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.validate()?;
        self.check_role(payload.role)?;
        self.app
            .queries
            .mutate(self.app.client().create_user(&payload), &Self::stale_keys())
            .await
    }

    pub async fn update(&self, user_id: i64, payload: UpdateUserRequest) -> Result<User, ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        payload.validate()?;
        if let Some(role) = payload.role {
            self.check_role(role)?;
        }
        self.app
            .queries
            .mutate(
                self.app.client().update_user(user_id, &payload),
                &Self::stale_keys(),
            )
            .await
    }

    pub async fn delete(&self, user_id: i64) -> Result<(), ApiError> {
        self.app.require(&RoleGate::teacher_or_admin())?;
        self.app
            .queries
            .mutate(self.app.client().delete_user(user_id), &Self::stale_keys())
            .await
    }
}
