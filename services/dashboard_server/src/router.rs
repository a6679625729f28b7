//! Request routing for the JSON API

use hyper::Method;

/// Endpoint a request resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    Summary,
    Metrics,
    Simulate,
    /// Known path, wrong method; `allow` goes into the `Allow` header
    MethodNotAllowed { allow: &'static str },
    NotFound,
}

/// Path, endpoint and the only method it accepts
const ROUTES: [(&str, Route, &str); 4] = [
    ("/health", Route::Health, "GET"),
    ("/api/summary", Route::Summary, "GET"),
    ("/api/metrics", Route::Metrics, "GET"),
    ("/api/simulate", Route::Simulate, "POST"),
];

/// Match a request to an endpoint. The trailing slash is optional.
pub fn route(method: &Method, path: &str) -> Route {
    let trimmed = path.trim_end_matches('/');
    for (prefix, endpoint, allowed) in ROUTES {
        if prefix == trimmed {
            return if method.as_str() == allowed {
                endpoint
            } else {
                Route::MethodNotAllowed { allow: allowed }
            };
        }
    }
    Route::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_api_paths() {
        assert_eq!(route(&Method::GET, "/api/summary/"), Route::Summary);
        assert_eq!(route(&Method::GET, "/api/summary"), Route::Summary);
        assert_eq!(route(&Method::GET, "/api/metrics/"), Route::Metrics);
        assert_eq!(route(&Method::POST, "/api/simulate/"), Route::Simulate);
        assert_eq!(route(&Method::GET, "/health"), Route::Health);
    }

    #[test]
    fn test_simulate_requires_post() {
        assert_eq!(
            route(&Method::GET, "/api/simulate/"),
            Route::MethodNotAllowed { allow: "POST" }
        );
        assert_eq!(
            route(&Method::PUT, "/api/simulate"),
            Route::MethodNotAllowed { allow: "POST" }
        );
    }

    #[test]
    fn test_read_endpoints_reject_writes() {
        assert_eq!(
            route(&Method::POST, "/api/summary/"),
            Route::MethodNotAllowed { allow: "GET" }
        );
    }

    #[test]
    fn test_route_unknown() {
        assert_eq!(route(&Method::GET, "/"), Route::NotFound);
        assert_eq!(route(&Method::GET, "/api/summaryx/"), Route::NotFound);
        assert_eq!(route(&Method::GET, "/api/"), Route::NotFound);
    }
}
