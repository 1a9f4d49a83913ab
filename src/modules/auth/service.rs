use tracing::instrument;
use userdesk_auth::create_access_token;
use userdesk_config::JwtConfig;
use userdesk_core::{AppError, verify_password};
use userdesk_db::{RoleRepository, UserRepository};
use userdesk_models::{CreateUserDto, LoginRequest, LoginResponse, User, system_roles};

use crate::modules::roles::service::RoleService;
use crate::modules::users::service::UserService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Self-registration. The caller is anonymous, so any requested role is
    /// replaced with the default one.
    #[instrument(skip(repo, dto), fields(email = %dto.email))]
    pub async fn register_user(
        repo: &dyn UserRepository,
        mut dto: CreateUserDto,
    ) -> Result<User, AppError> {
        if let Some(requested) = dto.role_id.filter(|&id| id != system_roles::DEFAULT) {
            tracing::warn!(requested, "Ignoring role requested at registration");
        }
        dto.role_id = Some(system_roles::DEFAULT);
        UserService::create_user(repo, dto).await
    }

    #[instrument(skip(users, roles, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        users: &dyn UserRepository,
        roles: &dyn RoleRepository,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(credentials) = users.find_credentials(&dto.email).await? else {
            tracing::warn!("Login failed: unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            tracing::warn!(user_id = credentials.user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = credentials.user;
        let role = RoleService::role_name(roles, user.role_id).await?;
        let access_token = create_access_token(user.id, &user.email, &role, jwt_config)?;

        tracing::info!(user_id = user.id, role = %role, "User logged in");
        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user,
        })
    }
}
