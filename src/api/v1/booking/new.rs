use crate::engine::BookingRequest;
use crate::methods::standard_replies;
use crate::ENGINE;
use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
struct NewBookingRequestBody {
    vehicle_id: i32,
    renter_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pickup_location: String,
    dropoff_location: String,
    #[serde(default)]
    insurance_fee: f64,
    /// Total the client displayed; rejected when it disagrees with the
    /// recomputed price.
    client_total: Option<f64>,
}

pub fn new_booking() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("new")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(|body: NewBookingRequestBody| async move {
            let created = spawn_blocking(move || {
                ENGINE.create_booking(&BookingRequest {
                    vehicle_id: body.vehicle_id,
                    renter_id: body.renter_id,
                    start_date: body.start_date,
                    end_date: body.end_date,
                    pickup_location: body.pickup_location,
                    dropoff_location: body.dropoff_location,
                    insurance_fee: body.insurance_fee,
                    client_total: body.client_total,
                })
            })
            .await;
            match created {
                Ok(Ok(booking)) => standard_replies::reply_with_obj(
                    &serde_json::json!({ "booking": booking }),
                    StatusCode::CREATED,
                ),
                Ok(Err(err)) => standard_replies::engine_error(err),
                Err(_) => standard_replies::internal_server_error_response(),
            }
        })
}
