mod mock_service;
mod test_utils;

pub use mock_service::{API_KEY, LinkResponse, MockService, MockState};
pub use test_utils::*;
