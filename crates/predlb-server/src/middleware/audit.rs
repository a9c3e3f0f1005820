use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs every API request as a structured event. The acting user, when
/// present, is included; request bodies never are.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let user_id = req
        .headers()
        .get(crate::routes::USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        user_id = user_id.as_deref(),
        "api_request"
    );

    response
}
