use crate::methods::standard_replies;
use crate::ENGINE;
use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::http::StatusCode;
use warp::Filter;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
struct QuoteRequestBody {
    vehicle_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    insurance_fee: f64,
}

pub fn vehicle_quote() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("quote")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and_then(|body: QuoteRequestBody| async move {
            let quoted = spawn_blocking(move || {
                ENGINE.quote(
                    body.vehicle_id,
                    body.start_date,
                    body.end_date,
                    body.insurance_fee,
                )
            })
            .await;
            match quoted {
                Ok(Ok(pricing)) => standard_replies::reply_with_obj(
                    &serde_json::json!({ "pricing": pricing }),
                    StatusCode::OK,
                ),
                Ok(Err(err)) => standard_replies::engine_error(err),
                Err(_) => standard_replies::internal_server_error_response(),
            }
        })
}
