use crate::helpers::JsonResponse;
use crate::middleware::authentication::*;
use crate::models;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse},
    Error,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

pub struct ManagerMiddleware<S> {
    pub service: Rc<S>,
}

/// Bearer token first, then the `access_token` cookie. A request that
/// carries neither only passes on a public path.
async fn resolve_caller(req: &mut ServiceRequest) -> Result<(), String> {
    let _ = method::try_oauth(req).await?
        || method::try_cookie(req).await?
        || method::anonym(req)?;

    Ok(())
}

impl<S, B> Service<ServiceRequest> for ManagerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            if let Err(msg) = resolve_caller(&mut req).await {
                tracing::info!("Rejected {} {}: {}", req.method(), req.path(), msg);
                return Err(JsonResponse::<models::User>::build().unauthorized(msg));
            }

            service.call(req).await
        })
    }
}
