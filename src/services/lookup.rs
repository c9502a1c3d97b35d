//! Tag and identifier lookups over the Tools and Users sheets

use crate::{
    error::AppResult,
    models::{
        tool::{Tool, ToolStatus},
        user::User,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LookupService {
    repository: Repository,
}

impl LookupService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Tool carrying the tag, `None` when no row matches
    pub async fn find_tool_by_tag(&self, tag: &str) -> AppResult<Option<Tool>> {
        let tool = self.repository.tools.find_by_rfid(tag).await?;
        if tool.is_none() {
            tracing::debug!("No tool with tag {}", tag);
        }
        Ok(tool)
    }

    /// Badge holder carrying the tag, `None` when no row matches
    pub async fn find_user_by_tag(&self, tag: &str) -> AppResult<Option<User>> {
        let user = self.repository.users.find_by_rfid(tag).await?;
        if user.is_none() {
            tracing::debug!("No user with badge {}", tag);
        }
        Ok(user)
    }

    pub async fn find_tool_by_id(&self, id: &str) -> AppResult<Option<Tool>> {
        self.repository.tools.find_by_id(id).await
    }

    pub async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.repository.users.find_by_id(id).await
    }

    pub async fn list_tools(&self) -> AppResult<Vec<Tool>> {
        self.repository.tools.list().await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Borrowed tools whose borrower cell names this user (by name or id)
    pub async fn tools_held_by(&self, user: &User) -> AppResult<Vec<Tool>> {
        let tools = self.repository.tools.list().await?;
        Ok(tools
            .into_iter()
            .filter(|tool| {
                tool.status == ToolStatus::Borrowed
                    && tool
                        .borrowed_by
                        .as_deref()
                        .is_some_and(|holder| holder == user.name || holder == user.id)
            })
            .collect())
    }
}
