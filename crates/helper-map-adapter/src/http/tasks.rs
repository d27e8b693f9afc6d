/*
[INPUT]:  Task snapshots and task identifiers
[OUTPUT]: Acceptance acknowledgements, accepted task list, deletions
[POS]:    HTTP layer - task lifecycle endpoints
[UPDATE]: When adding new task endpoints or changing request bodies
*/

use crate::http::{AcceptAck, HelperClient, Result};
use crate::types::{AcceptTaskRequest, MyTasksResponse};
use reqwest::Method;

impl HelperClient {
    /// Accept a task
    ///
    /// POST /api/accept_task
    /// Any JSON response is returned; the status is informational only.
    pub async fn accept_task(&self, req: &AcceptTaskRequest) -> Result<AcceptAck> {
        let builder = self.request(Method::POST, "/api/accept_task")?.json(req);
        self.send_any_json(builder).await
    }

    /// Tasks accepted by the current user
    ///
    /// GET /api/my_tasks
    pub async fn my_tasks(&self) -> Result<MyTasksResponse> {
        let builder = self.request(Method::GET, "/api/my_tasks")?;
        self.send_json(builder).await
    }

    /// Delete an accepted task
    ///
    /// DELETE /api/delete_task/{id}
    pub async fn delete_task(&self, task_id: i64) -> Result<()> {
        let endpoint = format!("/api/delete_task/{}", task_id);
        let builder = self.request(Method::DELETE, &endpoint)?;
        self.send_empty(builder).await
    }
}
