//! Member management service

use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{
        librarian::AdminId,
        member::{CreateMember, MemberDetails, UpdateMember},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List members with their derived amount_due
    pub async fn list_members(
        &self,
        admin: AdminId,
        search: Option<&str>,
    ) -> AppResult<Vec<MemberDetails>> {
        self.repository.members.list(admin, search).await
    }

    /// Get member with the derived amount_due
    pub async fn get_member(&self, admin: AdminId, id: i32) -> AppResult<MemberDetails> {
        self.repository.members.get_details(admin, id).await
    }

    /// Create a new member; member emails are unique system-wide
    pub async fn create_member(
        &self,
        admin: AdminId,
        member: CreateMember,
    ) -> AppResult<MemberDetails> {
        if self.repository.members.email_exists(&member.email, None).await? {
            return Err(AppError::DuplicateEmail(
                "A member with that email already exists".to_string(),
            ));
        }
        let created = self.repository.members.create(admin, &member).await?;
        tracing::info!("New member added: id={}", created.id);
        self.repository.members.get_details(admin, created.id).await
    }

    /// Update a member; the duplicate-email check excludes the member itself
    pub async fn update_member(
        &self,
        admin: AdminId,
        id: i32,
        member: UpdateMember,
    ) -> AppResult<MemberDetails> {
        // Scoped lookup first so a wrong-tenant id reports NotFound before
        // the system-wide email probe can reveal anything
        self.repository.members.get_by_id(admin, id).await?;

        if self.repository.members.email_exists(&member.email, Some(id)).await? {
            return Err(AppError::DuplicateEmail(
                "A member with that email already exists".to_string(),
            ));
        }
        self.repository.members.update(admin, id, &member).await?;
        self.repository.members.get_details(admin, id).await
    }

    /// Delete a member; refused while they have outstanding borrow records
    pub async fn delete_member(&self, admin: AdminId, id: i32) -> AppResult<()> {
        self.repository.members.delete(admin, id).await?;
        tracing::info!("Member deleted: id={}", id);
        Ok(())
    }

    /// Outstanding fines over the member's unreturned borrow records
    pub async fn amount_due(&self, admin: AdminId, member_id: i32) -> AppResult<Decimal> {
        self.repository.members.get_by_id(admin, member_id).await?;
        self.repository.members.amount_due(admin, member_id).await
    }
}
