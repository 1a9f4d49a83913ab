//! Operations behind `userdesk-cli` that talk to storage directly.

use userdesk_core::AppError;
use userdesk_db::UserRepository;
use userdesk_models::{CreateUserDto, User, system_roles};
use validator::Validate;

use crate::modules::users::service::UserService;

/// Creates a user holding the `admin` role. This is how the first admin
/// comes to exist, since the API only lets admins grant that role.
pub async fn create_admin(
    users: &dyn UserRepository,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let dto = CreateUserDto {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role_id: Some(system_roles::ADMIN),
    };
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    UserService::create_user(users, dto).await
}
