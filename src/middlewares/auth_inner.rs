//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::middlewares::correlation_id;
use crate::services::sessions::SessionService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let correlation = correlation_id(req.request());

            match authenticate(&req).await {
                Ok(user) => {
                    log::debug!("[{}] 인증 성공: 사용자 ID {}", correlation, user.user_id);
                    req.extensions_mut().insert(user);
                }
                Err(err) => {
                    if err.is_auth_failure() {
                        log::warn!("[{}] 인증 실패: {} {}", correlation, req.method(), req.path());
                    } else {
                        log::error!("[{}] 인증 처리 오류: {}", correlation, err);
                    }
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::from_err(err, req).map_into_right_body());
                }
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Authorization 헤더의 베어러 토큰을 검증하고 저장된 토큰과 대조
async fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let sessions = req
        .app_data::<web::Data<SessionService>>()
        .cloned()
        .ok_or_else(|| AppError::InternalError("SessionService is not registered".to_string()))?;

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = sessions.token_service().extract_bearer_token(auth_header)?;
    let user = sessions.authenticate_bearer(token).await?;

    Ok(AuthenticatedUser::from(&user))
}
