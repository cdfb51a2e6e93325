// src/profile/service.rs
use std::sync::Arc;
use tracing::{info, warn};

use super::{DepartmentCatalog, ProfileStore};
use crate::error::{CareerMatchError, CareerResult};
use crate::types::{Department, Session, UserId, UserProfile};

/// Department selection and supplement editing.
pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
    departments: Arc<dyn DepartmentCatalog>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>, departments: Arc<dyn DepartmentCatalog>) -> Self {
        Self {
            profiles,
            departments,
        }
    }

    /// Stored profile, or an empty one when the user has no record yet.
    pub async fn load(&self, uid: &UserId) -> CareerResult<UserProfile> {
        Ok(self.profiles.load(uid).await?.unwrap_or_default())
    }

    pub async fn list_departments(&self) -> CareerResult<Vec<Department>> {
        self.departments.list_departments().await
    }

    pub async fn add_department(&self, id: &str, name: &str) -> CareerResult<Department> {
        let (id, name) = (id.trim(), name.trim());
        if id.is_empty() || name.is_empty() {
            return Err(CareerMatchError::Persistence(
                "department id and name must not be empty".to_string(),
            ));
        }

        let department = Department {
            id: id.to_string(),
            name: name.to_string(),
        };
        self.departments.add_department(&department).await?;
        info!("Department catalog entry saved: {} ({})", department.name, department.id);
        Ok(department)
    }

    pub async fn select_department(
        &self,
        session: &Session,
        department_id: &str,
    ) -> CareerResult<Department> {
        let department = self
            .departments
            .get_department(department_id.trim())
            .await?
            .ok_or_else(|| {
                warn!("Unknown department requested: {}", department_id);
                CareerMatchError::Persistence(format!(
                    "Department '{}' not found",
                    department_id
                ))
            })?;

        self.profiles
            .set_department(&session.uid, session.email.as_deref(), &department)
            .await?;
        Ok(department)
    }

    /// Blank text clears the supplement.
    pub async fn save_extra_info(&self, uid: &UserId, text: &str) -> CareerResult<Option<String>> {
        let trimmed = text.trim();
        let value = (!trimmed.is_empty()).then(|| trimmed.to_string());

        self.profiles.set_extra_info(uid, value.as_deref()).await?;
        info!(
            "Extra info {} for user {}",
            if value.is_some() { "updated" } else { "cleared" },
            uid
        );
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> ProfileService {
        ProfileService::new(store.clone(), store.clone())
    }

    fn session() -> Session {
        Session {
            uid: UserId::new("u1").unwrap(),
            email: Some("u1@uni.edu".to_string()),
        }
    }

    #[tokio::test]
    async fn test_select_known_department() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        service.add_department("cs", "Computer Engineering").await.unwrap();

        let dept = service.select_department(&session(), "cs").await.unwrap();
        assert_eq!(dept.name, "Computer Engineering");

        let profile = service.load(&session().uid).await.unwrap();
        assert_eq!(profile.department_id.as_deref(), Some("cs"));
        assert_eq!(profile.email.as_deref(), Some("u1@uni.edu"));
    }

    #[tokio::test]
    async fn test_select_unknown_department_fails() {
        let store = Arc::new(MemoryStore::default());
        let err = service(&store)
            .select_department(&session(), "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, CareerMatchError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_blank_extra_info_clears() {
        let store = Arc::new(MemoryStore::default());
        let service = service(&store);
        let uid = session().uid;

        let saved = service.save_extra_info(&uid, "  Hackathon winner ").await.unwrap();
        assert_eq!(saved.as_deref(), Some("Hackathon winner"));
        assert_eq!(
            service.load(&uid).await.unwrap().extra_info.as_deref(),
            Some("Hackathon winner")
        );

        assert!(service.save_extra_info(&uid, "   ").await.unwrap().is_none());
        assert!(service.load(&uid).await.unwrap().extra_info.is_none());
    }

    #[tokio::test]
    async fn test_add_department_rejects_blank() {
        let store = Arc::new(MemoryStore::default());
        assert!(service(&store).add_department(" ", "Name").await.is_err());
    }
}
