//! Client registration and verification endpoints
//!
//! All handlers are generic over the core repository and messaging traits;
//! the binary instantiates them with the MySQL and HTTP implementations,
//! tests with the in-memory mocks.

pub mod cancel;
pub mod cooldown;
pub mod expire;
pub mod finalize;
pub mod register;
pub mod token;
pub mod verify;

pub use cancel::cancel;
pub use cooldown::cooldown;
pub use expire::expire;
pub use finalize::finalize;
pub use register::register;
pub use token::request_token;
pub use verify::verify;

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use actix_web::HttpRequest;

use vt_core::repositories::{AttemptRepository, ClientRepository, TokenRepository};
use vt_core::services::registration::RegistrationService;
use vt_core::services::verification::{MessageSender, VerificationService};

/// Shared services handed to every handler
pub struct AppState<C, T, A, M>
where
    C: ClientRepository,
    T: TokenRepository,
    A: AttemptRepository,
    M: MessageSender,
{
    pub verification: Arc<VerificationService<C, T, A, M>>,
    pub registration: Arc<RegistrationService<C, T>>,
}

/// Resolve the caller's IP address.
///
/// The first `X-Forwarded-For` entry wins (the service runs behind a
/// reverse proxy), falling back to the peer address. IPv4-mapped IPv6
/// addresses are reduced to their IPv4 form so the pin comparison does not
/// depend on which socket family the proxy used.
pub fn client_ip(req: &HttpRequest) -> IpAddr {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string());

    let raw = forwarded
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_default();
    let raw = raw.strip_prefix("::ffff:").unwrap_or(&raw);

    raw.parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn forwarded_header_wins_and_mapped_prefix_is_stripped() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "::ffff:181.65.1.2, 10.0.0.1"))
            .to_http_request();
        assert_eq!(client_ip(&req), "181.65.1.2".parse::<IpAddr>().unwrap());

        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "2001:db8::1"))
            .to_http_request();
        assert_eq!(client_ip(&req), "2001:db8::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn missing_header_falls_back_to_peer_or_unspecified() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(client_ip(&req), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
