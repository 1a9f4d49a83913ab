use tracing::instrument;
use userdesk_core::AppError;
use userdesk_db::RoleRepository;
use userdesk_models::Role;

pub struct RoleService;

impl RoleService {
    #[instrument(skip(repo))]
    pub async fn get_roles(repo: &dyn RoleRepository) -> Result<Vec<Role>, AppError> {
        Ok(repo.list().await?)
    }

    /// Name of the role with `id`. A user pointing at a missing role is a
    /// storage inconsistency, so this is an internal error.
    pub async fn role_name(repo: &dyn RoleRepository, id: i64) -> Result<String, AppError> {
        repo.get(id)
            .await?
            .map(|role| role.name)
            .ok_or_else(|| AppError::internal_error(format!("Role {} referenced but missing", id)))
    }
}
