use crate::methods::standard_replies;
use crate::model::BookingStatus;
use crate::ENGINE;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
struct CheckOutRequestBody {
    booking_id: i32,
    actor_id: i32,
    odometer: i32,
}

/// Take the vehicle back: IN_PROGRESS -> COMPLETED with the return
/// odometer reading; any extra mileage is charged here.
pub fn check_out() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("check-out")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(|body: CheckOutRequestBody| async move {
            let updated = spawn_blocking(move || {
                ENGINE.transition(
                    body.booking_id,
                    BookingStatus::Completed,
                    body.actor_id,
                    None,
                    Some(body.odometer),
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
