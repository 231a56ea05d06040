use lms_admin_shared::{
    ApiError, Assignment, AssignmentFilter, AssignmentList, AssignmentStatus,
    CreateAssignmentRequest, UpdateAssignmentRequest,
};
use serde::Serialize;

use crate::api_client::ApiClient;

#[derive(Serialize)]
struct StatusUpdate {
    status: AssignmentStatus,
}

impl ApiClient {
    pub async fn create_assignment(&self, payload: &CreateAssignmentRequest) -> Result<Assignment, ApiError> {
        self.post_json("/api/assignments/", payload).await
    }

    /// `GET /api/assignments/` (page defaults to 1, size to 10).
    pub async fn get_assignments(&self, filter: &AssignmentFilter) -> Result<AssignmentList, ApiError> {
        self.get_json_with_query("/api/assignments/", filter).await
    }

    pub async fn get_assignment(&self, assignment_id: i64) -> Result<Assignment, ApiError> {
        self.get_json(&format!("/api/assignments/{assignment_id}")).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        payload: &UpdateAssignmentRequest,
    ) -> Result<Assignment, ApiError> {
        self.put_json(&format!("/api/assignments/{assignment_id}"), payload)
            .await
    }

    pub async fn update_assignment_status(
        &self,
        assignment_id: i64,
        status: AssignmentStatus,
    ) -> Result<Assignment, ApiError> {
        self.put_json(
            &format!("/api/assignments/{assignment_id}"),
            &StatusUpdate { status },
        )
        .await
    }

    pub async fn delete_assignment(&self, assignment_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/assignments/{assignment_id}")).await
    }
}
