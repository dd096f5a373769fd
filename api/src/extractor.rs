use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use kernel::model::id::{BranchId, UserId};
use shared::error::AppError;

/// 認証レイヤー（上流のゲートウェイ）が全リクエストに付与する
/// 操作ユーザーの識別情報。認証そのものはこのサービスの管轄外。
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedUser {
    pub user_id: UserId,
    pub branch_id: BranchId,
}

const USER_ID_HEADER: &str = "x-user-id";
const BRANCH_ID_HEADER: &str = "x-branch-id";

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parse_id_header(parts, USER_ID_HEADER)?;
        let branch_id = parse_id_header(parts, BRANCH_ID_HEADER)?;
        Ok(Self {
            user_id: UserId::from(user_id),
            branch_id: BranchId::from(branch_id),
        })
    }
}

fn parse_id_header(parts: &Parts, name: &str) -> Result<uuid::Uuid, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::UnauthenticatedError(format!("missing or malformed {name} header")))
}
