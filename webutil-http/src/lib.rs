pub mod base36;
pub mod date;
pub mod etag;
pub mod fixes;
pub mod message;
pub mod origin;
pub mod status;

pub use base36::{base36_to_int, int_to_base36, Base36Error};
pub use date::{cookie_date, http_date, parse_http_date, parse_http_date_safe, DateError, MAX_HTTP_DATE_SECS};
pub use etag::{parse_etags, quote_etag};
pub use fixes::{
    apply_response_fixes, conditional_content_removal, fix_ie_for_attach, fix_ie_for_vary,
    fix_location_header,
};
pub use message::{Request, Response};
pub use origin::{is_safe_url, same_origin};
pub use status::StatusCode;
