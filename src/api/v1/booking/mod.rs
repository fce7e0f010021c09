mod cancel;
mod check_in;
mod check_out;
mod new;
mod status;

use warp::Filter;

pub fn api_v1_booking() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("booking").and(
        new::new_booking()
            .or(status::update_status())
            .or(check_in::check_in())
            .or(check_out::check_out())
            .or(cancel::cancel_booking()),
    )
}
