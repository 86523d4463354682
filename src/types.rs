//! Shared types used across content loading, composition, and rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    Contact,
    Terms,
    Privacy,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Home, Route::Contact, Route::Terms, Route::Privacy];

    /// URL path of the page (`/`, `/contact`, ...).
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Contact => "/contact",
            Route::Terms => "/terms",
            Route::Privacy => "/privacy",
        }
    }

    /// Output file relative to the site root.
    pub fn output_file(self) -> &'static str {
        match self {
            Route::Home => "index.html",
            Route::Contact => "contact/index.html",
            Route::Terms => "terms/index.html",
            Route::Privacy => "privacy/index.html",
        }
    }

    /// Resolve a navigation target. Trailing slashes and `index.html` are
    /// tolerated so links copied from the generated output still resolve.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path
            .trim()
            .trim_end_matches("index.html")
            .trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Home),
            "/contact" | "contact" => Some(Route::Contact),
            "/terms" | "terms" => Some(Route::Terms),
            "/privacy" | "privacy" => Some(Route::Privacy),
            _ => None,
        }
    }

    /// Short identifier used on the command line and in `data-page`.
    pub fn slug(self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Contact => "contact",
            Route::Terms => "terms",
            Route::Privacy => "privacy",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|r| r.slug() == slug)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Header navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub route: Route,
}

/// Header navigation, in display order.
pub const NAVIGATION: [NavLink; 4] = [
    NavLink {
        name: "Home",
        route: Route::Home,
    },
    NavLink {
        name: "About & Contact",
        route: Route::Contact,
    },
    NavLink {
        name: "Terms",
        route: Route::Terms,
    },
    NavLink {
        name: "Privacy",
        route: Route::Privacy,
    },
];

/// Footer "Navigation" column.
pub const FOOTER_NAVIGATION: [NavLink; 2] = [
    NavLink {
        name: "Home",
        route: Route::Home,
    },
    NavLink {
        name: "About & Contact",
        route: Route::Contact,
    },
];

/// Footer "Legal" column.
pub const FOOTER_LEGAL: [NavLink; 2] = [
    NavLink {
        name: "Terms & Conditions",
        route: Route::Terms,
    },
    NavLink {
        name: "Privacy Policy",
        route: Route::Privacy,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_through_from_path() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn from_path_tolerates_generated_file_names() {
        assert_eq!(Route::from_path("/index.html"), Some(Route::Home));
        assert_eq!(Route::from_path("/terms/"), Some(Route::Terms));
        assert_eq!(Route::from_path("/privacy/index.html"), Some(Route::Privacy));
        assert_eq!(Route::from_path("/blog"), None);
    }

    #[test]
    fn slugs_are_unique() {
        for route in Route::ALL {
            assert_eq!(Route::from_slug(route.slug()), Some(route));
        }
        assert_eq!(Route::from_slug("about"), None);
    }

    #[test]
    fn navigation_covers_every_route_once() {
        let routes: Vec<Route> = NAVIGATION.iter().map(|l| l.route).collect();
        assert_eq!(routes, Route::ALL.to_vec());
    }

    #[test]
    fn footer_columns_split_pages_from_policies() {
        assert!(FOOTER_NAVIGATION.iter().all(|l| matches!(l.route, Route::Home | Route::Contact)));
        assert!(FOOTER_LEGAL.iter().all(|l| matches!(l.route, Route::Terms | Route::Privacy)));
    }
}
