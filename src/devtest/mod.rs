//! The devtest application: a single page rendering the server's wall-clock
//! time into a fixed HTML template.

use chrono::Local;

use crate::context::Context;
use crate::http::{Response, StatusCode};
use crate::router::{RouteError, RouteTable};

// Matches the rendering of a naive datetime with microsecond precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Render the current local time. Impure by design of the page: two visits at
/// different instants produce different bodies.
pub async fn index(_ctx: Context) -> Response {
    let now = Local::now().format(TIMESTAMP_FORMAT);
    Response::new(StatusCode::Ok).body(format!("<html><body>It is now {now}.</body></html>"))
}

/// The app's route table, relative to its mount point.
pub fn routes() -> Result<RouteTable, RouteError> {
    let mut table = RouteTable::new();
    table.route("", index, Some("index"))?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Request;
    use std::time::Duration;

    fn make_request(path: &str) -> Request {
        let raw = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let (req, _) = Request::parse(raw.as_bytes()).unwrap();
        req
    }

    async fn get_index() -> String {
        let table = routes().unwrap();
        let m = table.resolve("/").unwrap();
        let ctx = Context::with_params(make_request("/"), m.params);
        let response = (m.handler)(ctx).await;
        assert_eq!(response.status(), StatusCode::Ok);
        String::from_utf8(response.body_bytes().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn body_matches_template() {
        let body = get_index().await;
        assert!(body.starts_with("<html><body>It is now "));
        assert!(body.ends_with(".</body></html>"));
    }

    #[tokio::test]
    async fn body_changes_with_the_clock() {
        let first = get_index().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = get_index().await;
        assert_ne!(first, second);
    }
}
