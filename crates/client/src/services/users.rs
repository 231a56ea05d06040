use lms_admin_shared::{
    ApiError, CreateUserRequest, UpdateUserRequest, User, UserFilter, UserListResponse,
};

use crate::api_client::ApiClient;

impl ApiClient {
    /// All users (admin only on the backend).
    pub async fn get_users(&self, filter: &UserFilter) -> Result<UserListResponse, ApiError> {
        self.get_json_with_query("/api/v1/users/", filter).await
    }

    /// Students created by the signed-in teacher.
    pub async fn get_my_students(&self, filter: &UserFilter) -> Result<UserListResponse, ApiError> {
        self.get_json_with_query("/api/v1/users/my-students", filter).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, ApiError> {
        self.get_json(&format!("/api/v1/users/{user_id}")).await
    }

    pub async fn create_user(&self, payload: &CreateUserRequest) -> Result<User, ApiError> {
        self.post_json("/api/v1/users/", payload).await
    }

    pub async fn update_user(&self, user_id: i64, payload: &UpdateUserRequest) -> Result<User, ApiError> {
        self.put_json(&format!("/api/v1/users/{user_id}"), payload).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/v1/users/{user_id}")).await
    }
}
