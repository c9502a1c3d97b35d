//! Users sheet accessor

use super::{rows::row_to_user, SheetTable};
use crate::{error::AppResult, models::user::User};

#[derive(Clone)]
pub struct UsersRepository {
    table: SheetTable,
}

impl UsersRepository {
    pub fn new(table: SheetTable) -> Self {
        Self { table }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        let rows = self.table.rows().await?;
        Ok(rows.iter().map(|row| row_to_user(row)).collect())
    }

    /// First user whose badge carries the tag
    pub async fn find_by_rfid(&self, rfid_uid: &str) -> AppResult<Option<User>> {
        Ok(self.list().await?.into_iter().find(|u| u.rfid_uid == rfid_uid))
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.list().await?.into_iter().find(|u| u.id == id))
    }
}
