//! Named screens and deep-link resolution.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Landing,
    Auth,
    Onboarding,
    Home,
    History,
    Settings,
}

impl Screen {
    pub const fn all() -> [Self; 6] {
        [
            Self::Landing,
            Self::Auth,
            Self::Onboarding,
            Self::Home,
            Self::History,
            Self::Settings,
        ]
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Auth => "/auth",
            Self::Onboarding => "/onboarding",
            Self::Home => "/app/home",
            Self::History => "/app/history",
            Self::Settings => "/app/settings",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::all().into_iter().find(|screen| screen.path() == path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub screen: Screen,
    pub path: &'static str,
    pub redirected: bool,
}

/// Maps a requested path to a screen. Unknown paths inside the signed-in area land on
/// [`Screen::Home`]; every other unknown path lands on [`Screen::Landing`].
pub fn resolve(requested: &str) -> Resolution {
    let path = normalize(requested);

    if let Some(screen) = Screen::from_path(&path) {
        return Resolution {
            screen,
            path: screen.path(),
            redirected: false,
        };
    }

    let screen = if path == "/app" || path.starts_with("/app/") {
        Screen::Home
    } else {
        Screen::Landing
    };

    Resolution {
        screen,
        path: screen.path(),
        redirected: true,
    }
}

fn normalize(requested: &str) -> String {
    let path = requested
        .trim()
        .trim_start_matches('#')
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
