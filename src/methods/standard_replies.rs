use crate::helper_model::{BookingError, ErrorResponse};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

pub fn reply_with_obj<T>(
    obj: &T,
    status_code: StatusCode,
) -> Result<(warp::reply::Response,), Rejection>
where
    T: serde::Serialize,
{
    Ok((warp::reply::with_status(warp::reply::json(obj), status_code).into_response(),))
}

pub fn internal_server_error_response() -> Result<(warp::reply::Response,), Rejection> {
    let msg = ErrorResponse {
        title: String::from("Internal Server Error"),
        message: String::from("Please try again later."),
    };
    Ok((warp::reply::with_status(warp::reply::json(&msg), StatusCode::INTERNAL_SERVER_ERROR)
        .into_response(),))
}

/// One place that turns engine outcomes into HTTP replies. Business
/// rejections keep their kind and message; storage faults are logged
/// and come back as a generic 500.
pub fn engine_error(err: BookingError) -> Result<(warp::reply::Response,), Rejection> {
    let status_code = match &err {
        BookingError::Validation(_) | BookingError::PriceMismatch { .. } => {
            StatusCode::BAD_REQUEST
        }
        BookingError::NotFound(_) => StatusCode::NOT_FOUND,
        BookingError::Conflict(_) | BookingError::State(_) => StatusCode::CONFLICT,
        BookingError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
        BookingError::Persistence(source) => {
            tracing::error!(error = %source, "storage failure");
            return internal_server_error_response();
        }
    };
    let msg = ErrorResponse {
        title: String::from(err.kind()),
        message: err.to_string(),
    };
    Ok((warp::reply::with_status(warp::reply::json(&msg), status_code).into_response(),))
}
