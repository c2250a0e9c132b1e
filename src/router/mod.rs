//! Request routing — map URL patterns to handler functions.
//!
//! This module provides [`RouteTable`], an ordered list of URL patterns bound
//! to handlers, and [`Router`], which composes namespaced tables into a site
//! and dispatches incoming requests. Patterns are literal segments mixed with
//! typed placeholders:
//!
//! | Pattern                     | Example match | Captured params        |
//! |-----------------------------|---------------|------------------------|
//! | `""`                        | `/`           | *(none)*               |
//! | `<int:question_id>/`        | `/5/`         | `question_id → 5`      |
//! | `<int:question_id>/vote`    | `/5/vote`     | `question_id → 5`      |
//! | `<str:slug>/`               | `/general/`   | `slug → "general"`     |
//!
//! `<int:...>` matches a single segment of ASCII digits and converts it to an
//! integer; a segment that fails the conversion simply does not match, and
//! scanning continues with the next route. A bare `<name>` placeholder is
//! shorthand for `<str:name>`. Trailing slashes are significant: a pattern
//! ending in `/` only matches a path ending in `/`.
//!
//! Routes are matched in registration order; the first structural match wins.
//! Route names are optional, must be unique within their table, and feed
//! [`Router::reverse`], which rebuilds a URL from a `"namespace:name"`
//! identifier and parameter values.

use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::context::{Context, ParamValue, PathParams};
use crate::{Request, Response, StatusCode};

/// Type-erased, heap-allocated async handler that processes a [`Context`] and
/// returns a [`Response`].
///
/// Handlers are stored behind `Arc<dyn Fn(…)>` so they can be cloned and shared
/// across threads without copying the underlying closure. In practice you never
/// construct this type directly — pass any async function or closure to
/// [`RouteTable::route`] instead.
pub type Handler =
    Arc<dyn Fn(Context) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this trait automatically via the blanket
/// impl below, so plain `async fn(Context) -> Response` items register without
/// ceremony.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given context, boxing the returned future.
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(ctx))
    }
}

/// Errors produced while building or reversing routes.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("route name {name:?} is already registered in this table")]
    DuplicateName { name: String },

    #[error("namespace {namespace:?} is already mounted")]
    DuplicateNamespace { namespace: String },

    #[error("no reverse match for route name {name:?}")]
    NoReverseMatch { name: String },
}

// A single path segment of a compiled pattern: a literal string to compare
// against, or a typed capture.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Int(String),
    Str(String),
}

// Compiled representation of a route pattern string. Splitting on `/` keeps
// empty trailing pieces, which is what makes trailing slashes significant.
#[derive(Debug, Clone)]
struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a pattern string such as `"<int:question_id>/vote"`.
    fn parse(pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &'static str| RouteError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason,
        };

        let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);
        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();

        for piece in trimmed.split('/') {
            if let Some(inner) = piece.strip_prefix('<') {
                let inner = inner
                    .strip_suffix('>')
                    .ok_or_else(|| invalid("unterminated placeholder"))?;

                let (converter, name) = match inner.split_once(':') {
                    Some((converter, name)) => (converter, name),
                    // A bare `<name>` defaults to the string converter.
                    None => ("str", inner),
                };

                if !is_identifier(name) {
                    return Err(invalid("placeholder name must be an identifier"));
                }
                if names.contains(&name) {
                    return Err(invalid("duplicate placeholder name"));
                }
                names.push(name);

                segments.push(match converter {
                    "int" => Segment::Int(name.to_owned()),
                    "str" => Segment::Str(name.to_owned()),
                    _ => return Err(invalid("unknown converter")),
                });
            } else if piece.contains('<') || piece.contains('>') {
                return Err(invalid("stray placeholder delimiter"));
            } else {
                segments.push(Segment::Literal(piece.to_owned()));
            }
        }

        Ok(Self { segments })
    }

    // Try to match a table-relative path against this pattern, returning the
    // extracted parameters on success.
    fn matches(&self, path: &str) -> Option<PathParams> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let pieces: Vec<&str> = path.split('/').collect();

        if pieces.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, piece) in self.segments.iter().zip(pieces) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != piece {
                        return None;
                    }
                }
                Segment::Int(name) => {
                    if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }
                    // Overflow is a conversion failure, not an error: the
                    // route does not match and scanning continues.
                    let value: u64 = piece.parse().ok()?;
                    params.insert(name.clone(), ParamValue::Int(value));
                }
                Segment::Str(name) => {
                    if piece.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), ParamValue::Str(piece.to_owned()));
                }
            }
        }

        Some(params)
    }

    // Rebuild the table-relative path from parameter values, or `None` when a
    // placeholder is missing from `args` or fails its converter.
    fn reverse(&self, args: &[(&str, &str)]) -> Option<String> {
        let lookup = |name: &str| {
            args.iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
        };

        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Int(name) => {
                    let value = lookup(name)?;
                    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }
                    out.push_str(value);
                }
                Segment::Str(name) => {
                    let value = lookup(name)?;
                    if value.is_empty() || value.contains('/') {
                        return None;
                    }
                    out.push_str(value);
                }
            }
        }
        Some(out)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// A single registered route binding a pattern to a handler, with an optional
// symbolic name for reversing.
struct Route {
    pattern: Pattern,
    handler: Handler,
    name: Option<String>,
}

/// A successful route resolution: the matched handler and the parameters
/// extracted from the path.
pub struct RouteMatch {
    pub handler: Handler,
    pub params: PathParams,
}

/// An ordered table of routes for one application.
///
/// Routes are evaluated in registration order; the first pattern that matches
/// structurally (including typed-segment conversion) wins.
///
/// # Examples
///
/// ```
/// use pollsite::router::RouteTable;
/// use pollsite::{Context, Response, StatusCode};
///
/// let mut table = RouteTable::new();
/// table
///     .route("", |_ctx| async { Response::new(StatusCode::Ok) }, Some("index"))
///     .unwrap();
/// table
///     .route(
///         "<int:question_id>/",
///         |ctx: Context| async move {
///             let id = ctx.params().int("question_id").unwrap_or(0);
///             Response::new(StatusCode::Ok).body(format!("question {id}"))
///         },
///         Some("detail"),
///     )
///     .unwrap();
///
/// let m = table.resolve("5/").unwrap();
/// assert_eq!(m.params.int("question_id"), Some(5));
/// assert!(table.resolve("abc/").is_none());
/// ```
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create a new, empty table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route at the end of the table.
    ///
    /// `pattern` is relative to the table's mount point. `name`, when given,
    /// must be unique within this table.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidPattern`] — the pattern string is malformed.
    /// - [`RouteError::DuplicateName`] — the name is already taken in this table.
    pub fn route(
        &mut self,
        pattern: &str,
        handler: impl IntoHandler,
        name: Option<&str>,
    ) -> Result<(), RouteError> {
        let pattern = Pattern::parse(pattern)?;

        if let Some(name) = name {
            if self.routes.iter().any(|r| r.name.as_deref() == Some(name)) {
                return Err(RouteError::DuplicateName {
                    name: name.to_owned(),
                });
            }
        }

        let handler: Handler = Arc::new(move |ctx| handler.call(ctx));
        self.routes.push(Route {
            pattern,
            handler,
            name: name.map(str::to_owned),
        });
        Ok(())
    }

    /// Resolve a table-relative path to the first matching route.
    ///
    /// Returns `None` when no pattern matches, which the server turns into a
    /// `404 Not Found` response.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        for route in &self.routes {
            if let Some(params) = route.pattern.matches(path) {
                return Some(RouteMatch {
                    handler: Arc::clone(&route.handler),
                    params,
                });
            }
        }
        None
    }

    /// Rebuild the table-relative path for the named route.
    ///
    /// # Errors
    ///
    /// [`RouteError::NoReverseMatch`] — no route has that name, a parameter is
    /// missing from `args`, or a value fails its segment's converter.
    pub fn reverse(&self, name: &str, args: &[(&str, &str)]) -> Result<String, RouteError> {
        self.reverse_relative(name, args)
            .ok_or_else(|| RouteError::NoReverseMatch {
                name: name.to_owned(),
            })
    }

    fn reverse_relative(&self, name: &str, args: &[(&str, &str)]) -> Option<String> {
        self.routes
            .iter()
            .find(|r| r.name.as_deref() == Some(name))?
            .pattern
            .reverse(args)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` if no routes have been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

// One application table mounted under a path prefix and a namespace.
struct Mount {
    prefix: String,
    namespace: String,
    table: RouteTable,
}

/// The site-wide router: namespaced application tables mounted under path
/// prefixes.
///
/// Resolution scans mounts in mount order; within each mount whose prefix
/// matches, the table's routes are scanned in registration order. When no
/// route matches anywhere, [`Router::dispatch`] answers `404 Not Found`.
///
/// # Examples
///
/// ```
/// use pollsite::router::{Router, RouteTable};
/// use pollsite::{Response, StatusCode};
///
/// let mut table = RouteTable::new();
/// table
///     .route("<int:question_id>/", |_ctx| async { Response::new(StatusCode::Ok) }, Some("detail"))
///     .unwrap();
///
/// let mut router = Router::new();
/// router.mount("/polls", "polls", table).unwrap();
///
/// assert!(router.resolve("/polls/5/").is_some());
/// assert!(router.resolve("/polls/abc/").is_none());
/// assert_eq!(
///     router.reverse("polls:detail", &[("question_id", "5")]).unwrap(),
///     "/polls/5/",
/// );
/// ```
#[derive(Default)]
pub struct Router {
    mounts: Vec<Mount>,
}

impl Router {
    /// Create a router with no mounted applications.
    pub fn new() -> Self {
        Self { mounts: Vec::new() }
    }

    /// Mount an application table under `prefix`, scoping its route names
    /// under `namespace`.
    ///
    /// The prefix is normalized to have a leading and no trailing slash;
    /// mounting at `"/"` puts the table at the site root.
    ///
    /// # Errors
    ///
    /// [`RouteError::DuplicateNamespace`] — the namespace is already in use.
    pub fn mount(
        &mut self,
        prefix: &str,
        namespace: &str,
        table: RouteTable,
    ) -> Result<(), RouteError> {
        if self.mounts.iter().any(|m| m.namespace == namespace) {
            return Err(RouteError::DuplicateNamespace {
                namespace: namespace.to_owned(),
            });
        }

        let trimmed = prefix.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };

        self.mounts.push(Mount {
            prefix,
            namespace: namespace.to_owned(),
            table,
        });
        Ok(())
    }

    /// Resolve an absolute request path against every mounted table.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        for mount in &self.mounts {
            let Some(rest) = path.strip_prefix(mount.prefix.as_str()) else {
                continue;
            };
            // The prefix must end at a segment boundary: `/pollsx` is not
            // under `/polls`, and `/polls` without the trailing slash is not
            // the polls index.
            if !rest.starts_with('/') {
                continue;
            }
            if let Some(m) = mount.table.resolve(rest) {
                return Some(m);
            }
        }
        None
    }

    /// Dispatch a request to the first matching route and return its response.
    ///
    /// When no route matches, a `404 Not Found` response is returned.
    pub async fn dispatch(&self, request: Request) -> Response {
        match self.resolve(request.path()) {
            Some(m) => {
                tracing::debug!(path = %request.path(), "route matched");
                let ctx = Context::with_params(request, m.params);
                (m.handler)(ctx).await
            }
            None => {
                tracing::debug!(path = %request.path(), "no route matched");
                Response::new(StatusCode::NotFound)
            }
        }
    }

    /// Rebuild the absolute path for a `"namespace:name"` route identifier.
    ///
    /// # Errors
    ///
    /// [`RouteError::NoReverseMatch`] — the identifier has no namespace, the
    /// namespace is not mounted, the name is unknown within it, or an argument
    /// fails its segment's converter.
    pub fn reverse(&self, name: &str, args: &[(&str, &str)]) -> Result<String, RouteError> {
        let no_match = || RouteError::NoReverseMatch {
            name: name.to_owned(),
        };

        let (namespace, local) = name.split_once(':').ok_or_else(no_match)?;
        let mount = self
            .mounts
            .iter()
            .find(|m| m.namespace == namespace)
            .ok_or_else(no_match)?;
        let relative = mount
            .table
            .reverse_relative(local, args)
            .ok_or_else(no_match)?;

        Ok(format!("{}/{}", mount.prefix, relative))
    }
}
