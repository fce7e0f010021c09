use crate::methods::standard_replies;
use crate::ENGINE;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
struct CancelRequestBody {
    booking_id: i32,
    actor_id: i32,
    reason: String,
}

pub fn cancel_booking() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("cancel")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(|body: CancelRequestBody| async move {
            let cancelled = spawn_blocking(move || {
                ENGINE.cancel(body.booking_id, &body.reason, body.actor_id)
            })
            .await;
            match cancelled {
                Ok(Ok(booking)) => standard_replies::reply_with_obj(
                    &serde_json::json!({ "booking": booking }),
                    StatusCode::OK,
                ),
                Ok(Err(err)) => standard_replies::engine_error(err),
                Err(_) => standard_replies::internal_server_error_response(),
            }
        })
}
