mod authenticate_user;
mod change_user_role;
mod delete_media;
mod delete_user;
mod get_media;
mod get_stats;
mod list_media;
mod list_pending_media;
mod list_users;
mod register_user;
mod resolve_caller;
mod review_media;
mod update_user;
mod upload_media;

pub use authenticate_user::AuthenticateUserUseCase;
pub use change_user_role::ChangeUserRoleUseCase;
pub use delete_media::DeleteMediaUseCase;
pub use delete_user::DeleteUserUseCase;
pub use get_media::GetMediaUseCase;
pub use get_stats::GetStatsUseCase;
pub use list_media::ListMediaUseCase;
pub use list_pending_media::ListPendingMediaUseCase;
pub use list_users::ListUsersUseCase;
pub use register_user::RegisterUserUseCase;
pub use resolve_caller::{require_role, ResolveCallerUseCase};
pub use review_media::ReviewMediaUseCase;
pub use update_user::UpdateUserUseCase;
pub use upload_media::UploadMediaUseCase;
