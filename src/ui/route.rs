/// Views reachable from the navigation menu, plus the login screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Login,
    DataView,
    HeaderMapping,
    CellMapping,
    Import,
    Account,
}

impl Route {
    pub const MENU: [Route; 5] = [
        Route::DataView,
        Route::HeaderMapping,
        Route::CellMapping,
        Route::Import,
        Route::Account,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::DataView => "Data View",
            Route::HeaderMapping => "Data View Mapping",
            Route::CellMapping => "Excel Mapping",
            Route::Import => "Import",
            Route::Account => "User Management",
        }
    }

    pub fn requires_session(self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Where an unauthenticated visitor actually lands.
    pub fn guarded(self, authenticated: bool) -> Route {
        if self.requires_session() && !authenticated {
            Route::Login
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_routes_need_a_session() {
        assert!(Route::MENU.iter().all(|route| route.requires_session()));
        assert_eq!(Route::Import.guarded(false), Route::Login);
        assert_eq!(Route::Import.guarded(true), Route::Import);
        assert_eq!(Route::Login.guarded(false), Route::Login);
    }
}
