//! Endpoint helpers layered on [`TripItClient::execute`](crate::http::TripItClient::execute).

mod objects;
mod pro;
mod profile;
mod trips;

pub use objects::ObjectType;
pub use trips::{ListTripsParams, Traveler};

pub const DEFAULT_PAGE_SIZE: u32 = 25;

fn paginate(params: &mut Vec<String>, page_num: u32, page_size: u32) {
    params.push(format!("page_num={}", page_num));
    params.push(format!("page_size={}", page_size));
}
