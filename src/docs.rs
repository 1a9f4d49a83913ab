use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use userdesk_core::ErrorResponse;
use userdesk_models::{
    CreateUserDto, LoginRequest, LoginResponse, MessageResponse, Role, UpdateUserDto, User,
    UserEnvelope,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::roles::controller::get_roles,
    ),
    components(
        schemas(
            User,
            UserEnvelope,
            CreateUserDto,
            UpdateUserDto,
            Role,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and token issuance"),
        (name = "Users", description = "User management endpoints"),
        (name = "Roles", description = "Role listing")
    ),
    info(
        title = "Userdesk API",
        version = "0.1.0",
        description = "User and role administration backend with JWT bearer authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
