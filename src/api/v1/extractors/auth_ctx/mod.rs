/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト（AuthCtx）を handler に提供する
 * - axum extractor は core に、型定義と accessor は types に分離する
 *
 * Public API:
 * - AuthCtx, CognitoUser, CognitoIdentity
 * - current_user / current_identity
 * - CurrentUser / CurrentIdentity
 */

mod core;
mod types;

pub use core::{CurrentIdentity, CurrentUser};
pub use types::{AuthCtx, CognitoIdentity, CognitoUser, current_identity, current_user};
