use actix_web::dev::ServiceRequest;

/// Paths reachable without a user.
const PUBLIC_PATHS: &[&str] = &["/health_check"];

#[tracing::instrument(name = "authenticate as anonym", skip(req))]
pub fn anonym(req: &mut ServiceRequest) -> Result<bool, String> {
    if PUBLIC_PATHS.contains(&req.path()) {
        return Ok(true);
    }

    tracing::debug!("Anonymous request to {} rejected", req.path());
    Err("Authentication required".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn health_check_is_public() {
        let mut req = TestRequest::with_uri("/health_check").to_srv_request();
        assert_eq!(anonym(&mut req), Ok(true));
    }

    #[test]
    fn everything_else_needs_a_user() {
        let mut req = TestRequest::with_uri("/chat/sessions").to_srv_request();
        assert!(anonym(&mut req).is_err());
    }
}
