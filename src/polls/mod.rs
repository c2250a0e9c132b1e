//! The polls application: a handful of text pages keyed by question id.
//!
//! There is no question store behind these pages; each handler renders the id
//! it was given verbatim, and voting records nothing.

use crate::context::Context;
use crate::http::{Response, StatusCode};
use crate::router::{RouteError, RouteTable};

/// The polls landing page.
pub async fn index(_ctx: Context) -> Response {
    Response::new(StatusCode::Ok).body("Hello. You are at polls index")
}

/// Detail page for one question.
pub async fn detail(ctx: Context) -> Response {
    let id = ctx.params().int("question_id").unwrap_or(0);
    Response::new(StatusCode::Ok).body(format!("You are looking at question {id}."))
}

/// Vote page for one question. No vote is recorded.
pub async fn vote(ctx: Context) -> Response {
    let id = ctx.params().int("question_id").unwrap_or(0);
    Response::new(StatusCode::Ok).body(format!("You are voting for question {id}."))
}

/// Results page for one question.
pub async fn results(ctx: Context) -> Response {
    let id = ctx.params().int("question_id").unwrap_or(0);
    Response::new(StatusCode::Ok).body(format!(
        "You're looking at the results of question {id}."
    ))
}

/// The app's route table, relative to its mount point.
pub fn routes() -> Result<RouteTable, RouteError> {
    let mut table = RouteTable::new();
    table.route("", index, Some("index"))?;
    table.route("<int:question_id>/", detail, Some("detail"))?;
    table.route("<int:question_id>/vote", vote, Some("vote"))?;
    table.route("<int:question_id>/results/", results, Some("results"))?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Request;

    fn make_request(path: &str) -> Request {
        let raw = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let (req, _) = Request::parse(raw.as_bytes()).unwrap();
        req
    }

    async fn get(table: &RouteTable, path: &str) -> Option<Response> {
        let m = table.resolve(path)?;
        let ctx = Context::with_params(make_request(path), m.params);
        Some((m.handler)(ctx).await)
    }

    fn body(response: &Response) -> String {
        String::from_utf8(response.body_bytes().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn index_returns_fixed_greeting() {
        let table = routes().unwrap();
        let response = get(&table, "/").await.unwrap();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(body(&response), "Hello. You are at polls index");
    }

    #[tokio::test]
    async fn detail_interpolates_question_id_verbatim() {
        let table = routes().unwrap();
        for id in ["0", "5", "1234", "18446744073709551615"] {
            let response = get(&table, &format!("/{id}/")).await.unwrap();
            assert_eq!(response.status(), StatusCode::Ok);
            assert_eq!(body(&response), format!("You are looking at question {id}."));
        }
    }

    #[tokio::test]
    async fn non_integer_segment_does_not_resolve() {
        let table = routes().unwrap();
        assert!(get(&table, "/abc/").await.is_none());
    }

    #[tokio::test]
    async fn vote_is_idempotent() {
        let table = routes().unwrap();
        let first = get(&table, "/5/vote").await.unwrap();
        let second = get(&table, "/5/vote").await.unwrap();
        assert_eq!(first.status(), StatusCode::Ok);
        assert_eq!(body(&first), body(&second));
        assert!(body(&first).contains('5'));
    }

    #[tokio::test]
    async fn results_wording_differs_from_detail() {
        let table = routes().unwrap();
        let results = get(&table, "/5/results/").await.unwrap();
        let detail = get(&table, "/5/").await.unwrap();
        assert!(body(&results).contains('5'));
        assert_ne!(body(&results), body(&detail));
    }
}
