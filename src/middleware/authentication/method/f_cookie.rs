use crate::middleware::authentication::get_header;
use actix_web::dev::ServiceRequest;

fn access_token(cookies: &str) -> Option<String> {
    cookies.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        (name == "access_token" && !value.is_empty()).then(|| value.to_string())
    })
}

#[tracing::instrument(name = "Authenticate with cookie", skip(req))]
pub async fn try_cookie(req: &mut ServiceRequest) -> Result<bool, String> {
    let cookie_header = match get_header::<String>(req, "cookie")? {
        Some(header) => header,
        None => return Ok(false),
    };

    let token = match access_token(&cookie_header) {
        Some(token) => token,
        None => return Ok(false),
    };

    tracing::debug!("Found access_token in cookies");
    super::f_oauth::authenticate(req, token).await?;

    Ok(true)
}
