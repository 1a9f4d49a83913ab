use anyhow::anyhow;
use tracing::instrument;
use userdesk_core::{AppError, hash_password};
use userdesk_db::{NewUser, UserChanges, UserRepository};
use userdesk_models::{CreateUserDto, UpdateUserDto, User, system_roles};

pub struct UserService;

impl UserService {
    #[instrument(skip(repo))]
    pub async fn get_users(repo: &dyn UserRepository) -> Result<Vec<User>, AppError> {
        Ok(repo.list().await?)
    }

    #[instrument(skip(repo))]
    pub async fn get_user(repo: &dyn UserRepository, id: i64) -> Result<User, AppError> {
        repo.get(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))
    }

    #[instrument(skip(repo, dto), fields(email = %dto.email))]
    pub async fn create_user(repo: &dyn UserRepository, dto: CreateUserDto) -> Result<User, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let user = repo
            .create(NewUser {
                name: dto.name,
                email: dto.email,
                password_hash,
                role_id: dto.role_id.unwrap_or(system_roles::DEFAULT),
            })
            .await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(repo, dto))]
    pub async fn update_user(
        repo: &dyn UserRepository,
        id: i64,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let changes = UserChanges {
            name: dto.name,
            email: dto.email,
            password_hash,
            role_id: dto.role_id,
        };

        repo.update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))
    }

    #[instrument(skip(repo))]
    pub async fn delete_user(repo: &dyn UserRepository, id: i64) -> Result<(), AppError> {
        if !repo.delete(id).await? {
            return Err(AppError::not_found(anyhow!("User with id {} not found", id)));
        }

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
