//! Admin URLs for entities referenced by log entries.
//! Used by: listview::render, state.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;
use url::Url;

use crate::audit::entry::EntityRef;
use crate::markup::{self, DASH};

const DEFAULT_PATH: &str = "routes.json";
const ID_PLACEHOLDER: &str = "{id}";

// Everything that may not appear raw inside one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no admin route for {kind:?}")]
pub struct NoRoute {
    pub kind: String,
}

pub trait LinkResolver {
    fn resolve(&self, entity: &EntityRef) -> Result<String, NoRoute>;
}

/// URL templates keyed by entity kind, e.g. `"order" -> "/admin/orders/{id}"`.
#[derive(Debug, Clone)]
pub struct RouteTable {
    base: Option<Url>,
    routes: HashMap<Box<str>, String>,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RouteFile(HashMap<String, String>);

#[derive(Debug, thiserror::Error)]
pub enum RouteFileError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Default for RouteTable {
    fn default() -> Self {
        let routes = [
            ("user", "/admin/users/{id}"),
            ("contact", "/admin/contacts/{id}"),
            ("order", "/admin/orders/{id}"),
            ("product", "/admin/products/{id}"),
            ("shop", "/admin/shops/{id}"),
        ]
        .into_iter()
        .map(|(kind, template)| (Box::from(kind), template.to_string()))
        .collect();
        Self { base: None, routes }
    }
}

impl RouteTable {
    pub fn new(routes: HashMap<Box<str>, String>) -> Self {
        Self { base: None, routes }
    }

    /// Resolved paths are joined onto `base`.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    pub fn from_file(path: &str) -> Result<Self, RouteFileError> {
        let content = std::fs::read_to_string(path)?;
        let RouteFile(raw) = serde_json::from_str(&content)?;
        let routes = raw.into_iter().map(|(k, v)| (k.into_boxed_str(), v)).collect();
        Ok(Self::new(routes))
    }

    pub fn from_file_or_default(path: Option<&str>) -> Self {
        let path = path.unwrap_or(DEFAULT_PATH);
        match Self::from_file(path) {
            Ok(table) => {
                tracing::info!(path, routes = table.routes.len(), "loaded admin routes");
                table
            }
            Err(e) => {
                tracing::debug!(path, error = %e, "using built-in admin routes");
                Self::default()
            }
        }
    }
}

impl LinkResolver for RouteTable {
    fn resolve(&self, entity: &EntityRef) -> Result<String, NoRoute> {
        let no_route = || NoRoute {
            kind: entity.kind.clone(),
        };
        let template = self.routes.get(entity.kind.as_str()).ok_or_else(no_route)?;
        let id = utf8_percent_encode(&entity.id, PATH_SEGMENT).to_string();
        let path = template.replace(ID_PLACEHOLDER, &id);
        match &self.base {
            Some(base) => base.join(&path).map(String::from).map_err(|_| no_route()),
            None => Ok(path),
        }
    }
}

/// Anchor markup for `entity`, or its raw id when no route resolves.
pub fn render_link(entity: Option<&EntityRef>, resolver: &dyn LinkResolver) -> String {
    let Some(entity) = entity else {
        return DASH.to_string();
    };
    match resolver.resolve(entity) {
        Ok(href) => format!(
            r#"<a href="{}" target="_blank">{}</a>"#,
            markup::escape(&href),
            markup::escape(&entity.label)
        ),
        Err(e) => {
            tracing::debug!(kind = %entity.kind, id = %entity.id, error = %e, "link fallback");
            markup::escape(&entity.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoRoutes;

    impl LinkResolver for NoRoutes {
        fn resolve(&self, entity: &EntityRef) -> Result<String, NoRoute> {
            Err(NoRoute {
                kind: entity.kind.clone(),
            })
        }
    }

    fn order(id: &str) -> EntityRef {
        EntityRef::new("order", id, format!("Order #{id}"))
    }

    #[test]
    fn absent_entity_is_dash() {
        assert_eq!(render_link(None, &RouteTable::default()), "-");
    }

    #[test]
    fn resolved_entity_renders_anchor() {
        assert_eq!(
            render_link(Some(&order("12")), &RouteTable::default()),
            r#"<a href="/admin/orders/12" target="_blank">Order #12</a>"#
        );
    }

    #[test]
    fn failing_resolver_falls_back_to_identifier() {
        assert_eq!(render_link(Some(&order("12")), &NoRoutes), "12");
    }

    #[test]
    fn unknown_kind_falls_back_to_identifier() {
        let entity = EntityRef::new("gift_card", "GC<1>", "Gift card");
        assert_eq!(render_link(Some(&entity), &RouteTable::default()), "GC&lt;1&gt;");
    }

    #[test]
    fn unknown_kind_is_no_route() {
        let err = RouteTable::default()
            .resolve(&EntityRef::new("gift_card", "1", "x"))
            .unwrap_err();
        assert_eq!(err.kind, "gift_card");
    }

    #[test]
    fn base_url_is_joined() -> Result<(), url::ParseError> {
        let table = RouteTable::default().with_base_url(Url::parse("https://shop.example/")?);
        assert_eq!(
            table.resolve(&order("5")),
            Ok("https://shop.example/admin/orders/5".to_string())
        );
        Ok(())
    }

    #[test]
    fn ids_are_encoded_in_paths() {
        let table = RouteTable::default();
        assert_eq!(table.resolve(&order("a/b c")), Ok("/admin/orders/a%2Fb%20c".to_string()));
        assert_eq!(table.resolve(&order("1+1?#")), Ok("/admin/orders/1+1%3F%23".to_string()));
    }

    #[test]
    fn encoded_ids_survive_base_url_join() -> Result<(), url::ParseError> {
        let table = RouteTable::default().with_base_url(Url::parse("https://shop.test/")?);
        assert_eq!(
            table.resolve(&order("a b")),
            Ok("https://shop.test/admin/orders/a%20b".to_string())
        );
        Ok(())
    }

    #[test]
    fn custom_routes_replace_defaults() {
        let routes = [(Box::from("order"), "/o/{id}/edit".to_string())].into_iter().collect();
        let table = RouteTable::new(routes);
        assert_eq!(table.resolve(&order("9")), Ok("/o/9/edit".to_string()));
        assert!(table.resolve(&EntityRef::new("user", "1", "bob")).is_err());
    }

    #[test]
    fn missing_route_file_uses_defaults() {
        let table = RouteTable::from_file_or_default(Some("/nonexistent/routes.json"));
        assert!(table.resolve(&order("1")).is_ok());
    }
}
