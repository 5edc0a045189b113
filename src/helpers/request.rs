use actix_web::HttpRequest;

/// First hop of `X-Forwarded-For`, else the peer address.
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty());

    forwarded.or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
}

pub fn user_agent(req: &HttpRequest) -> String {
    req.headers()
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn forwarded_for_takes_precedence() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "10.0.0.1, 172.16.0.1"))
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .to_http_request();

        assert_eq!(client_ip(&req).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn falls_back_to_peer_address() {
        let req = TestRequest::default()
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .insert_header(("user-agent", "curl/8.0"))
            .to_http_request();

        assert_eq!(client_ip(&req).as_deref(), Some("127.0.0.1"));
        assert_eq!(user_agent(&req), "curl/8.0");
    }
}
