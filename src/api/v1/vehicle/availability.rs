use crate::methods::standard_replies;
use crate::ENGINE;
use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
struct AvailabilityRequestBody {
    vehicle_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    exclude_booking_id: Option<i32>,
}

pub fn vehicle_availability(
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("availability")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(|body: AvailabilityRequestBody| async move {
            let checked = spawn_blocking(move || {
                ENGINE.check_availability(
                    body.vehicle_id,
                    body.start_date,
                    body.end_date,
                    body.exclude_booking_id,
                )
            })
            .await;
            match checked {
                Ok(Ok(available)) => standard_replies::reply_with_obj(
                    &serde_json::json!({ "available": available }),
                    StatusCode::OK,
                ),
                Ok(Err(err)) => standard_replies::engine_error(err),
                Err(_) => standard_replies::internal_server_error_response(),
            }
        })
}
