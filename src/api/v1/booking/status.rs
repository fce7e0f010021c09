use crate::methods::standard_replies;
use crate::model::BookingStatus;
use crate::ENGINE;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
struct UpdateStatusRequestBody {
    booking_id: i32,
    status: BookingStatus,
    actor_id: i32,
    reason: Option<String>,
    odometer: Option<i32>,
}

pub fn update_status() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("status")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(|body: UpdateStatusRequestBody| async move {
            let updated = spawn_blocking(move || {
                ENGINE.transition(
                    body.booking_id,
                    body.status,
                    body.actor_id,
                    body.reason.as_deref(),
                    body.odometer,
                )
            })
            .await;
            match updated {
                Ok(Ok(booking)) => standard_replies::reply_with_obj(
                    &serde_json::json!({ "booking": booking }),
                    StatusCode::OK,
                ),
                Ok(Err(err)) => standard_replies::engine_error(err),
                Err(_) => standard_replies::internal_server_error_response(),
            }
        })
}
