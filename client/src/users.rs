//! User and external-project operations
//!
//! Every operation returns the raw [`ApiResponse`]; only transport failures
//! are errors. Callers assert on the status and body, or classify them with
//! [`ApiResponse::into_result`].
//!
//! | operation                  | request                        | success |
//! |----------------------------|--------------------------------|---------|
//! | `create_user`              | `POST /users`                  | 201     |
//! | `get_user`                 | `GET /users/{id}`              | 200     |
//! | `update_user`              | `PUT /users/{id}`              | 200     |
//! | `delete_user`              | `DELETE /users/{id}`           | 204     |
//! | `add_external_project`     | `POST /users/{id}/projects`    | 201     |
//! | `list_external_projects`   | `GET /users/{id}/projects`     | 200     |

use crate::{
    client::SkywardClient,
    error::Result,
    response::ApiResponse,
    session::Session,
    types::{NewExternalProject, NewUser, UpdateUser},
};

impl SkywardClient {
    /// Create a user
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the request cannot be sent
    pub async fn create_user(&self, session: &Session, user: &NewUser) -> Result<ApiResponse> {
        let request = session.apply(self.http().post(self.url("/users"))).json(user);
        let response = self.execute(request).await?;
        tracing::debug!(email = %user.email, status = response.status().as_u16(), "create_user");
        Ok(response)
    }

    /// Fetch a user by identifier
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the request cannot be sent
    pub async fn get_user(&self, session: &Session, id: i64) -> Result<ApiResponse> {
        let request = session.apply(self.http().get(self.url(&format!("/users/{id}"))));
        let response = self.execute(request).await?;
        tracing::debug!(id, status = response.status().as_u16(), "get_user");
        Ok(response)
    }

    /// Replace a user's email, password and name
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the request cannot be sent
    pub async fn update_user(
        &self,
        session: &Session,
        id: i64,
        update: &UpdateUser,
    ) -> Result<ApiResponse> {
        let request = session
            .apply(self.http().put(self.url(&format!("/users/{id}"))))
            .json(update);
        let response = self.execute(request).await?;
        tracing::debug!(id, status = response.status().as_u16(), "update_user");
        Ok(response)
    }

    /// Delete a user
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the request cannot be sent
    pub async fn delete_user(&self, session: &Session, id: i64) -> Result<ApiResponse> {
        let request = session.apply(self.http().delete(self.url(&format!("/users/{id}"))));
        let response = self.execute(request).await?;
        tracing::debug!(id, status = response.status().as_u16(), "delete_user");
        Ok(response)
    }

    /// Attach an external project to a user
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the request cannot be sent
    pub async fn add_external_project(
        &self,
        session: &Session,
        user_id: i64,
        project: &NewExternalProject,
    ) -> Result<ApiResponse> {
        let request = session
            .apply(self.http().post(self.url(&format!("/users/{user_id}/projects"))))
            .json(project);
        let response = self.execute(request).await?;
        tracing::debug!(user_id, status = response.status().as_u16(), "add_external_project");
        Ok(response)
    }

    /// List a user's external projects
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the request cannot be sent
    pub async fn list_external_projects(
        &self,
        session: &Session,
        user_id: i64,
    ) -> Result<ApiResponse> {
        let request =
            session.apply(self.http().get(self.url(&format!("/users/{user_id}/projects"))));
        let response = self.execute(request).await?;
        tracing::debug!(user_id, status = response.status().as_u16(), "list_external_projects");
        Ok(response)
    }
}
